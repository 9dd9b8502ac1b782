pub mod events;

#[cfg(feature = "sdl2")]
pub mod sdl_renderer;

#[cfg(feature = "image")]
pub mod image_renderer;

use crate::input::Input;
use crate::tile::TILE_SIZE;
use std::convert::Infallible;

pub use events::GameEvent;

/// Side of the square logical screen, in pixels.
pub const SCREEN_SIZE: i32 = 128;

pub const BOARD_BACKGROUND: u8 = 18;
pub const DARK_TEXT: u8 = 19;
pub const LIGHT_TEXT: u8 = 20;
pub const GAME_OVER_BACKGROUND: u8 = 21;
pub const SPLASH_BACKGROUND: u8 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Index 0 is an empty slot, 1..=17 are tiles by exponent, the rest are screen colors.
pub const PALETTE: [Rgb; 23] = [
    Rgb(205, 193, 180),
    Rgb(238, 228, 218),
    Rgb(237, 224, 200),
    Rgb(242, 177, 121),
    Rgb(245, 149, 99),
    Rgb(246, 124, 95),
    Rgb(246, 94, 59),
    Rgb(237, 207, 114),
    Rgb(237, 204, 97),
    Rgb(237, 200, 80),
    Rgb(237, 197, 63),
    Rgb(237, 194, 46),
    Rgb(94, 218, 146),
    Rgb(37, 187, 100),
    Rgb(35, 140, 81),
    Rgb(113, 180, 213),
    Rgb(25, 130, 196),
    Rgb(120, 90, 190),
    Rgb(187, 173, 160),
    Rgb(119, 110, 101),
    Rgb(249, 246, 242),
    Rgb(50, 44, 40),
    Rgb(0, 0, 0),
];

pub fn color(index: u8) -> Rgb {
    PALETTE
        .get(index as usize)
        .copied()
        .unwrap_or(PALETTE[PALETTE.len() - 1])
}

/// Which point of the text box `(x, y)` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
}

impl Anchor {
    /// Top-left corner of a `width` x `height` box anchored at `(x, y)`.
    pub fn origin(self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        match self {
            Anchor::TopLeft => (x, y),
            Anchor::TopCenter => (x - width / 2, y),
            Anchor::TopRight => (x - width, y),
            Anchor::Center => (x - width / 2, y - height / 2),
        }
    }
}

/// One tile-shaped draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSprite {
    pub x: i32,
    pub y: i32,
    /// Palette index of the tile face.
    pub color: u8,
    pub label: Option<u32>,
    /// Zoom in percent, applied about the tile center.
    pub scale: u8,
}

impl TileSprite {
    pub fn slot(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            color: 0,
            label: None,
            scale: 100,
        }
    }

    pub fn text_color(&self) -> u8 {
        if self.color == 1 || self.color == 2 {
            DARK_TEXT
        } else {
            LIGHT_TEXT
        }
    }

    /// Screen rectangle `(x, y, side)` covered once the zoom is applied.
    pub fn bounds(&self) -> (i32, i32, i32) {
        let side = TILE_SIZE * self.scale as i32 / 100;
        let half = TILE_SIZE / 2;

        (self.x + half - side / 2, self.y + half - side / 2, side)
    }
}

/// Drawing surface the game paints each frame onto
pub trait Renderer {
    type Error;

    fn clear(&mut self, color: u8) -> Result<(), Self::Error>;

    fn draw_tile(&mut self, sprite: &TileSprite) -> Result<(), Self::Error>;

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        anchor: Anchor,
        color: u8,
    ) -> Result<(), Self::Error>;

    /// Show everything drawn since the last `clear`
    fn present(&mut self) -> Result<(), Self::Error>;

    /// Play a feedback effect
    fn handle_event(&mut self, event: &GameEvent) -> Result<(), Self::Error> {
        let _ = event;
        Ok(())
    }

    /// Feed button presses from interactive frontends
    fn poll_input(&mut self, input: &mut Input) {
        let _ = input;
    }

    /// Check if the user wants to quit (for interactive renderers)
    fn should_quit(&mut self) -> bool {
        false
    }
}

/// Discards everything, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    type Error = Infallible;

    fn clear(&mut self, _color: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_tile(&mut self, _sprite: &TileSprite) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_text(&mut self, _: &str, _: i32, _: i32, _: Anchor, _: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
