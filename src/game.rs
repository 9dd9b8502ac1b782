use crate::board::{Board, MoveOutcome};
use crate::grid::Direction;
use crate::input::{Button, Input};
use crate::pool::TileId;
use crate::render::{Anchor, GameEvent, Renderer, GAME_OVER_BACKGROUND, LIGHT_TEXT};
use crate::save::{HighScore, Storage};
use crate::splash::SplashAnimation;
use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SPLASH_DELAY: Duration = Duration::from_millis(1000);
pub const LOST_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Pause before the title tiles start rising.
    pub splash_delay: Duration,
    /// How long the locked board stays on screen before the game over screen.
    pub lost_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            splash_delay: SPLASH_DELAY,
            lost_delay: LOST_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Splash(SplashAnimation),
    Launch,
    Start,
    /// Opening pair of tiles, spawned on the first tick.
    Init { pending: Option<[TileId; 2]> },
    /// Tile added after a move, spawned on the first tick.
    Spawn { pending: Option<TileId> },
    Play,
    Sliding,
    Lost { elapsed: Duration },
    GameOver,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub score: u32,
    pub moves: u32,
    /// Highest exponent made by a merge.
    pub highest: u8,
}

impl Stats {
    fn record(&mut self, outcome: &MoveOutcome) {
        self.score += outcome.points;
        self.highest = self.highest.max(outcome.highest);
    }
}

pub struct Game<S: Storage> {
    board: Board,
    state: State,
    stats: Stats,
    high_score: HighScore,
    storage: S,
    rng: XorShiftRng,
    seed: u64,
    timings: Timings,
    events: Vec<GameEvent>,
}

impl<S: Storage> Game<S> {
    pub fn new(mut storage: S, seed: u64, timings: Timings) -> Self {
        let high_score = HighScore::load(&mut storage);

        Self {
            board: Board::new(),
            state: State::Splash(SplashAnimation::new()),
            stats: Stats::default(),
            high_score,
            storage,
            rng: XorShiftRng::seed_from_u64(seed),
            seed,
            timings,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn high_score(&self) -> u16 {
        self.high_score.value
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_over(&self) -> bool {
        self.state == State::GameOver
    }

    /// Feedback effects queued since the last call.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Runs the update routine of the current state for one frame lasting `dt`.
    pub fn tick(&mut self, input: &mut Input, dt: Duration) {
        trace!("tick {:?}", self.state);

        self.state = match std::mem::replace(&mut self.state, State::Play) {
            State::Splash(mut splash) => {
                if splash.advance(dt, self.timings.splash_delay) {
                    State::Launch
                } else {
                    State::Splash(splash)
                }
            }
            State::Launch => {
                if input.pressed(Button::Action) {
                    State::Start
                } else {
                    State::Launch
                }
            }
            State::Start => {
                self.start();
                State::Init { pending: None }
            }
            State::Init { pending } => self.init(pending),
            State::Play => self.play(input),
            State::Sliding => self.show_move(),
            State::Spawn { pending } => self.spawn(pending),
            State::Lost { elapsed } => self.lost(elapsed + dt),
            State::GameOver => {
                if input.pressed(Button::Action) {
                    self.events.push(GameEvent::Fade);
                    State::Start
                } else {
                    State::GameOver
                }
            }
        };

        input.clear();
    }

    fn start(&mut self) {
        self.board.reset();
        self.stats = Stats::default();

        info!("New game");
    }

    fn init(&mut self, pending: Option<[TileId; 2]>) -> State {
        let pending = match pending {
            Some(pending) => pending,
            None => match (self.board.spawn(&mut self.rng), self.board.spawn(&mut self.rng)) {
                (Some(first), Some(second)) => [first, second],
                _ => {
                    warn!("No room for the opening tiles");
                    return State::Play;
                }
            },
        };

        let first = self.board.arise(pending[0]);
        let second = self.board.arise(pending[1]);

        if first || second {
            State::Init {
                pending: Some(pending),
            }
        } else {
            State::Play
        }
    }

    fn play(&mut self, input: &mut Input) -> State {
        for button in Button::DIRECTIONS {
            if !input.pressed(button) {
                continue;
            }

            if let Some(direction) = button.direction() {
                return self.shift(direction);
            }
        }

        State::Play
    }

    fn shift(&mut self, direction: Direction) -> State {
        let outcome = self.board.shift(direction);

        self.stats.record(&outcome);

        if outcome.milestone {
            info!("Reached 2048");
            self.events.push(GameEvent::Rainbow);
        }

        if outcome.moved() {
            State::Sliding
        } else {
            State::Play
        }
    }

    fn show_move(&mut self) -> State {
        if self.board.animate() {
            return State::Sliding;
        }

        self.stats.moves += 1;
        debug!("Move {} settled, score {}", self.stats.moves, self.stats.score);

        State::Spawn { pending: None }
    }

    fn spawn(&mut self, pending: Option<TileId>) -> State {
        let pending = pending.or_else(|| self.board.spawn(&mut self.rng));

        if let Some(id) = pending {
            if self.board.is_arising(id) {
                self.board.arise(id);
                return State::Spawn { pending: Some(id) };
            }
        }

        if self.board.is_lost() {
            info!(
                "Board locked after {} moves with score {}",
                self.stats.moves, self.stats.score
            );
            self.events.push(GameEvent::Flash);

            State::Lost {
                elapsed: Duration::ZERO,
            }
        } else {
            State::Play
        }
    }

    fn lost(&mut self, elapsed: Duration) -> State {
        if elapsed < self.timings.lost_delay {
            return State::Lost { elapsed };
        }

        if let Err(e) = self
            .high_score
            .save_if_improved(&mut self.storage, self.stats.score)
        {
            warn!("Failed to save high score: {}", e);
        }

        self.board.reset();
        self.events.push(GameEvent::Fade);

        State::GameOver
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), R::Error> {
        match &self.state {
            State::Splash(splash) => splash.draw(renderer)?,
            State::Launch => SplashAnimation::settled().draw(renderer)?,
            State::GameOver => self.draw_game_over(renderer)?,
            _ => self.board.draw(renderer)?,
        }

        renderer.present()
    }

    fn draw_game_over<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), R::Error> {
        let x = crate::render::SCREEN_SIZE / 2;
        let y = 22;

        renderer.clear(GAME_OVER_BACKGROUND)?;

        renderer.draw_text("GAME OVER", x, y, Anchor::TopCenter, 6)?;
        renderer.draw_text("HIGH SCORE", x, y + 64, Anchor::TopCenter, 14)?;
        renderer.draw_text(&self.high_score.value.to_string(), x + 4, y + 76, Anchor::TopCenter, 12)?;

        renderer.draw_text("Best", x - 4, y + 20, Anchor::TopRight, 9)?;
        renderer.draw_text("Moves", x - 4, y + 32, Anchor::TopRight, 9)?;
        renderer.draw_text("Score", x - 4, y + 44, Anchor::TopRight, 9)?;

        let best = 1u32 << self.stats.highest;

        renderer.draw_text(&best.to_string(), x + 4, y + 20, Anchor::TopLeft, LIGHT_TEXT)?;
        renderer.draw_text(&self.stats.moves.to_string(), x + 4, y + 32, Anchor::TopLeft, LIGHT_TEXT)?;
        renderer.draw_text(&self.stats.score.to_string(), x + 4, y + 44, Anchor::TopLeft, LIGHT_TEXT)?;

        Ok(())
    }
}
