use crate::game::{Game, State};
use crate::input::{Button, Input};
use crate::render::{NullRenderer, Renderer};
use crate::save::Storage;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One frame at 60 fps.
pub const FRAME: Duration = Duration::from_micros(16_667);
pub const MAX_FRAMES: u64 = 2_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub seed: u64,
    pub score: u32,
    pub moves: u32,
    /// Largest tile value made by a merge.
    pub best_tile: u32,
    pub high_score: u16,
    pub frames: u64,
    /// False when the frame cap hit before the game ended.
    pub finished: bool,
}

/// Presses random buttons for whatever the game is waiting on
pub struct Autoplayer {
    rng: XorShiftRng,
}

impl Autoplayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }

    pub fn press(&mut self, state: &State, input: &mut Input) {
        match state {
            State::Launch => input.press(Button::Action),
            State::Play => {
                if let Some(&button) = Button::DIRECTIONS.choose(&mut self.rng) {
                    input.press(button);
                }
            }
            _ => {}
        }
    }
}

/// Plays one full game headless, from the splash screen to game over.
pub fn play_session<S: Storage>(
    game: &mut Game<S>,
    player: &mut Autoplayer,
    max_frames: u64,
) -> SessionReport {
    match play_session_with(game, player, max_frames, &mut NullRenderer) {
        Ok(report) => report,
        Err(never) => match never {},
    }
}

/// Like [`play_session`], drawing every frame onto `renderer`.
pub fn play_session_with<S: Storage, R: Renderer + ?Sized>(
    game: &mut Game<S>,
    player: &mut Autoplayer,
    max_frames: u64,
    renderer: &mut R,
) -> Result<SessionReport, R::Error> {
    let mut input = Input::new();
    let mut frames = 0;

    while !game.is_over() && frames < max_frames {
        player.press(game.state(), &mut input);
        game.tick(&mut input, FRAME);

        for event in game.drain_events() {
            renderer.handle_event(&event)?;
        }

        game.draw(renderer)?;
        frames += 1;
    }

    let stats = game.stats();
    let finished = game.is_over();

    if finished {
        debug!("Seed {} finished in {} frames", game.seed(), frames);
    } else {
        warn!("Seed {} still running after {} frames", game.seed(), frames);
    }

    Ok(SessionReport {
        seed: game.seed(),
        score: stats.score,
        moves: stats.moves,
        best_tile: 1 << stats.highest,
        high_score: game.high_score(),
        frames,
        finished,
    })
}
