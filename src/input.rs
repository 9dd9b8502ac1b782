use crate::grid::Direction;
use enum_map::{Enum, EnumMap};

#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Up,
    Right,
    Down,
    Action,
}

impl Button {
    /// Directional buttons in the order the game polls them.
    pub const DIRECTIONS: [Button; 4] = [Button::Left, Button::Up, Button::Right, Button::Down];

    pub fn direction(self) -> Option<Direction> {
        match self {
            Button::Left => Some(Direction::Left),
            Button::Up => Some(Direction::Up),
            Button::Right => Some(Direction::Right),
            Button::Down => Some(Direction::Down),
            Button::Action => None,
        }
    }
}

/// Edge-triggered button state: a press is reported once, then forgotten.
#[derive(Debug, Default, Clone)]
pub struct Input {
    pressed: EnumMap<Button, bool>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) {
        self.pressed[button] = true;
    }

    /// Whether `button` was pressed since the last check.
    pub fn pressed(&mut self, button: Button) -> bool {
        std::mem::take(&mut self.pressed[button])
    }

    /// Drops presses nobody asked about.
    pub fn clear(&mut self) {
        self.pressed = EnumMap::default();
    }
}
