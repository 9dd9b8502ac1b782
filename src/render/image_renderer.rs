use super::{color, Anchor, Renderer, TileSprite, SCREEN_SIZE};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::trace;
use rusttype::{Font, Scale};
use std::fs;
use std::path::Path;

const TEXT_HEIGHT: f32 = 10.0;

fn pixel(index: u8) -> Rgba<u8> {
    let rgb = color(index);

    Rgba([rgb.0, rgb.1, rgb.2, 255])
}

/// Offscreen renderer that keeps the last presented frame as an image
pub struct ImageRenderer {
    zoom: u32,
    frame: RgbaImage,
    presented: RgbaImage,
    font: Option<Font<'static>>,
    frames: u64,
}

impl ImageRenderer {
    pub fn new(zoom: u32) -> Self {
        let zoom = zoom.max(1);
        let side = SCREEN_SIZE as u32 * zoom;

        Self {
            zoom,
            frame: RgbaImage::new(side, side),
            presented: RgbaImage::new(side, side),
            font: None,
            frames: 0,
        }
    }

    /// Loads a TrueType font; without one, text is skipped.
    pub fn with_font(mut self, path: &Path) -> Result<Self, String> {
        let bytes = fs::read(path).map_err(|e| format!("Failed to read font: {}", e))?;
        let font = Font::try_from_vec(bytes).ok_or("Invalid font file")?;

        self.font = Some(font);
        Ok(self)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> &RgbaImage {
        &self.presented
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        self.presented
            .save(path)
            .map_err(|e| format!("Failed to save image: {}", e))
    }

    fn fill(&mut self, x: i32, y: i32, side: i32, color: u8) {
        if side <= 0 {
            return;
        }

        let zoom = self.zoom as i32;
        let rect = Rect::at(x * zoom, y * zoom).of_size((side * zoom) as u32, (side * zoom) as u32);

        draw_filled_rect_mut(&mut self.frame, rect, pixel(color));
    }

    fn text(&mut self, text: &str, x: i32, y: i32, height: f32, anchor: Anchor, color: u8) {
        let Some(font) = &self.font else {
            trace!("no font, skipping {:?}", text);
            return;
        };

        let zoom = self.zoom as i32;
        let scale = Scale::uniform(height * self.zoom as f32);
        let (width, text_height) = text_size(scale, font, text);
        let (left, top) = anchor.origin(x * zoom, y * zoom, width, text_height);

        draw_text_mut(&mut self.frame, pixel(color), left, top, scale, font, text);
    }
}

impl Renderer for ImageRenderer {
    type Error = String;

    fn clear(&mut self, color: u8) -> Result<(), Self::Error> {
        let background = pixel(color);

        for p in self.frame.pixels_mut() {
            *p = background;
        }

        Ok(())
    }

    fn draw_tile(&mut self, sprite: &TileSprite) -> Result<(), Self::Error> {
        let (x, y, side) = sprite.bounds();

        self.fill(x, y, side, sprite.color);

        if let Some(label) = sprite.label {
            let height = TEXT_HEIGHT * sprite.scale as f32 / 100.0;

            self.text(
                &label.to_string(),
                x + side / 2,
                y + side / 2,
                height,
                Anchor::Center,
                sprite.text_color(),
            );
        }

        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        anchor: Anchor,
        color: u8,
    ) -> Result<(), Self::Error> {
        self.text(text, x, y, TEXT_HEIGHT, anchor, color);
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.presented.clone_from(&self.frame);
        self.frames += 1;
        Ok(())
    }
}
