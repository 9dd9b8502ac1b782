use super::{color, Anchor, GameEvent, Renderer, TileSprite, SCREEN_SIZE};
use crate::input::{Button, Input};

use log::debug;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::{FullscreenType, Window};
use sdl2::EventPump;

const TITLE: &str = "2048";
const FLASH_FRAMES: u32 = 30;
const RAINBOW_FRAMES: u32 = 60;

#[derive(Debug, Clone, Copy)]
pub struct SdlConfig {
    pub zoom: u32,
    pub vsync: bool,
    pub fullscreen: bool,
}

fn sdl_color(index: u8) -> Color {
    let rgb = color(index);

    Color::RGB(rgb.0, rgb.1, rgb.2)
}

fn button(keycode: Keycode) -> Option<Button> {
    match keycode {
        Keycode::Left | Keycode::A => Some(Button::Left),
        Keycode::Up | Keycode::W => Some(Button::Up),
        Keycode::Right | Keycode::D => Some(Button::Right),
        Keycode::Down | Keycode::S => Some(Button::Down),
        Keycode::Space | Keycode::Return | Keycode::Z => Some(Button::Action),
        _ => None,
    }
}

/// Window frontend; text goes to the title bar
pub struct SdlRenderer {
    canvas: Canvas<Window>,
    events: EventPump,
    zoom: u32,
    caption: Vec<String>,
    flash: u32,
    rainbow: u32,
    should_quit: bool,
}

impl SdlRenderer {
    pub fn new(config: &SdlConfig) -> Result<Self, String> {
        let context = sdl2::init()?;
        let video = context.video()?;
        let zoom = config.zoom.max(1);
        let side = SCREEN_SIZE as u32 * zoom;

        let mut window = video
            .window(TITLE, side, side)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        if config.fullscreen {
            window.set_fullscreen(FullscreenType::True)?;
        }

        if window.fullscreen_state() != FullscreenType::Off {
            context.mouse().show_cursor(false);
        }

        let mut builder = window.into_canvas();

        if config.vsync {
            builder = builder.present_vsync();
        }

        let canvas = builder.build().map_err(|e| e.to_string())?;
        let events = context.event_pump()?;

        Ok(Self {
            canvas,
            events,
            zoom,
            caption: Vec::new(),
            flash: 0,
            rainbow: 0,
            should_quit: false,
        })
    }

    fn background(&self, index: u8) -> Color {
        if self.flash > 0 && (self.flash / 5) % 2 == 0 {
            Color::RGB(200, 0, 0)
        } else if self.rainbow > 0 {
            sdl_color(1 + ((self.rainbow / 4) % 11) as u8)
        } else {
            sdl_color(index)
        }
    }
}

impl Renderer for SdlRenderer {
    type Error = String;

    fn clear(&mut self, color: u8) -> Result<(), Self::Error> {
        let background = self.background(color);

        self.canvas.set_draw_color(background);
        self.canvas.clear();
        self.caption.clear();
        Ok(())
    }

    fn draw_tile(&mut self, sprite: &TileSprite) -> Result<(), Self::Error> {
        let (x, y, side) = sprite.bounds();

        if side <= 0 {
            return Ok(());
        }

        let zoom = self.zoom as i32;
        let rect = Rect::new(x * zoom, y * zoom, (side * zoom) as u32, (side * zoom) as u32);

        self.canvas.set_draw_color(sdl_color(sprite.color));
        self.canvas.fill_rect(rect).map_err(|e| e.to_string())
    }

    fn draw_text(
        &mut self,
        text: &str,
        _x: i32,
        _y: i32,
        _anchor: Anchor,
        _color: u8,
    ) -> Result<(), Self::Error> {
        self.caption.push(text.to_string());
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        let title = if self.caption.is_empty() {
            TITLE.to_string()
        } else {
            format!("{} - {}", TITLE, self.caption.join(" "))
        };

        if self.canvas.window().title() != title {
            self.canvas
                .window_mut()
                .set_title(&title)
                .map_err(|e| e.to_string())?;
        }

        self.canvas.present();

        self.flash = self.flash.saturating_sub(1);
        self.rainbow = self.rainbow.saturating_sub(1);

        Ok(())
    }

    fn handle_event(&mut self, event: &GameEvent) -> Result<(), Self::Error> {
        debug!("effect {:?}", event);

        match event {
            GameEvent::Flash => self.flash = FLASH_FRAMES,
            GameEvent::Rainbow => self.rainbow = RAINBOW_FRAMES,
            GameEvent::Fade => {}
        }

        Ok(())
    }

    fn poll_input(&mut self, input: &mut Input) {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    self.should_quit = true;
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    if let Some(button) = button(keycode) {
                        input.press(button);
                    }
                }
                _ => {}
            }
        }
    }

    fn should_quit(&mut self) -> bool {
        self.should_quit
    }
}
