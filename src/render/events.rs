use serde::{Deserialize, Serialize};

/// Fire-and-forget feedback effects the game asks its frontends for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The board locked up
    Flash,

    /// A 2048 tile was made
    Rainbow,

    /// Screen transition into or out of the game over screen
    Fade,
}
