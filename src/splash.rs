use crate::render::{Anchor, Renderer, TileSprite, LIGHT_TEXT, SCREEN_SIZE, SPLASH_BACKGROUND};
use crate::tile::cell_origin;
use std::time::Duration;

/// Palette entries of the four title tiles, spelling 2 0 4 8.
const TITLE: [u8; 4] = [1, 0, 2, 3];
const LOGO_SIZE: i32 = 48;
const CAPTION_Y: i32 = 17 + LOGO_SIZE + 8;
const REST_Y: i32 = CAPTION_Y + 20;

/// The title tiles rising into place one after another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashAnimation {
    elapsed: Duration,
    step: usize,
    ys: [i32; 4],
}

impl Default for SplashAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashAnimation {
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            step: 0,
            ys: [SCREEN_SIZE; 4],
        }
    }

    /// The final frame, every tile at rest.
    pub fn settled() -> Self {
        Self {
            elapsed: Duration::ZERO,
            step: TITLE.len(),
            ys: [REST_Y; 4],
        }
    }

    /// Current top edge of each title tile, off screen until it starts rising.
    pub fn tile_tops(&self) -> [i32; 4] {
        self.ys
    }

    pub fn is_done(&self) -> bool {
        self.step >= TITLE.len()
    }

    /// Moves the current tile up after `delay` has passed, returning whether all have landed.
    pub fn advance(&mut self, dt: Duration, delay: Duration) -> bool {
        self.elapsed += dt;

        if self.elapsed < delay || self.is_done() {
            return self.is_done();
        }

        let y = &mut self.ys[self.step];
        let dy = *y - REST_Y;

        if dy < 2 {
            *y = REST_Y;
            self.step += 1;
        } else {
            *y -= dy >> 1;
        }

        self.is_done()
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.clear(SPLASH_BACKGROUND)?;
        renderer.draw_text("presents", SCREEN_SIZE / 2, CAPTION_Y, Anchor::TopCenter, LIGHT_TEXT)?;

        for (i, (&color, &y)) in TITLE.iter().zip(self.ys.iter()).enumerate() {
            if y >= SCREEN_SIZE {
                continue;
            }

            let label = if color == 0 { 0 } else { 1 << color };

            renderer.draw_tile(&TileSprite {
                x: cell_origin(i),
                y,
                color,
                label: Some(label),
                scale: 100,
            })?;
        }

        Ok(())
    }
}
