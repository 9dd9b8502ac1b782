//! Board state machine and tile animation engine for a 4x4 tile-merging game.
//!
//! Each frame the driver calls [`game::Game::tick`] with the buttons pressed
//! since the previous frame, forwards the queued [`render::GameEvent`]s and then
//! paints the frame with [`game::Game::draw`] onto any [`render::Renderer`].

pub mod autoplay;
pub mod board;
pub mod game;
pub mod grid;
pub mod input;
pub mod pool;
pub mod render;
pub mod save;
pub mod splash;
pub mod tile;

#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;

pub use board::{Board, MoveOutcome};
pub use game::{Game, State, Stats, Timings};
pub use grid::{Direction, Grid, Transform};
pub use input::{Button, Input};
pub use pool::{TileId, TilePool};
pub use tile::Tile;
