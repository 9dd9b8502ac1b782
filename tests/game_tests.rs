use game_2048::render::{
    color, Anchor, GameEvent, Renderer, Rgb, TileSprite, GAME_OVER_BACKGROUND, SCREEN_SIZE,
    SPLASH_BACKGROUND,
};
use game_2048::save::{MemoryStorage, RECORD_OFFSET, RECORD_SIZE};
use game_2048::splash::SplashAnimation;
use game_2048::{Board, Button, Game, Input, State, Timings};
use std::time::Duration;

// Fixed seed for deterministic tests
const TEST_SEED: u64 = 42;

const FRAME: Duration = Duration::from_millis(16);

fn new_game() -> Game<MemoryStorage> {
    Game::new(MemoryStorage::default(), TEST_SEED, Timings::default())
}

fn tick_until<F: Fn(&State) -> bool>(game: &mut Game<MemoryStorage>, done: F) -> usize {
    let mut input = Input::new();
    let mut frames = 0;

    while !done(game.state()) {
        game.tick(&mut input, FRAME);
        frames += 1;
        assert!(frames < 10_000, "stuck in {:?}", game.state());
    }

    frames
}

fn press(game: &mut Game<MemoryStorage>, button: Button) {
    let mut input = Input::new();

    input.press(button);
    game.tick(&mut input, FRAME);
}

fn start_playing() -> Game<MemoryStorage> {
    let mut game = new_game();

    tick_until(&mut game, |state| *state == State::Launch);
    press(&mut game, Button::Action);
    tick_until(&mut game, |state| *state == State::Play);
    game.drain_events().for_each(drop);

    game
}

#[test]
fn test_splash_waits_before_rising() {
    let mut game = new_game();
    let mut input = Input::new();

    game.tick(&mut input, Duration::from_millis(500));
    match game.state() {
        State::Splash(splash) => assert_eq!(splash.tile_tops(), [SCREEN_SIZE; 4]),
        other => panic!("left the splash early: {:?}", other),
    }

    game.tick(&mut input, Duration::from_millis(500));
    match game.state() {
        State::Splash(splash) => {
            let tops = splash.tile_tops();

            assert!(tops[0] < SCREEN_SIZE);
            assert_eq!(tops[1..], [SCREEN_SIZE; 3]);
        }
        other => panic!("left the splash early: {:?}", other),
    }

    let frames = tick_until(&mut game, |state| *state == State::Launch);
    assert!(frames > 4);

    let tops = SplashAnimation::settled().tile_tops();
    assert!(tops.iter().all(|&top| top == tops[0] && top < SCREEN_SIZE));
}

/// Keeps the palette index of every `clear` call.
#[derive(Default)]
struct ClearLog {
    clears: Vec<u8>,
}

impl Renderer for ClearLog {
    type Error = ();

    fn clear(&mut self, color: u8) -> Result<(), Self::Error> {
        self.clears.push(color);
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

#[test]
fn test_splash_clears_to_black() {
    let mut game = new_game();
    let mut renderer = ClearLog::default();

    game.draw(&mut renderer).unwrap();
    tick_until(&mut game, |state| *state == State::Launch);
    game.draw(&mut renderer).unwrap();

    assert_eq!(renderer.clears, vec![SPLASH_BACKGROUND, SPLASH_BACKGROUND]);
    assert_eq!(color(SPLASH_BACKGROUND), Rgb(0, 0, 0));
    assert_ne!(SPLASH_BACKGROUND, GAME_OVER_BACKGROUND);
}

#[test]
fn test_launch_waits_for_action() {
    let mut game = new_game();
    tick_until(&mut game, |state| *state == State::Launch);

    for button in Button::DIRECTIONS {
        press(&mut game, button);
        assert_eq!(*game.state(), State::Launch);
    }

    press(&mut game, Button::Action);
    assert_eq!(*game.state(), State::Start);
}

#[test]
fn test_new_game_opens_with_two_tiles() {
    let game = start_playing();
    let board = game.board();

    assert_eq!(board.occupied_cells(), 2);
    assert_eq!(board.free_cells(), 14);
    assert_eq!(game.stats().score, 0);
    assert_eq!(game.stats().moves, 0);

    for row in 0..4 {
        for col in 0..4 {
            if let Some(tile) = board.tile_at(row, col) {
                assert!(!tile.is_animating());
                assert!(tile.value() == 2 || tile.value() == 4);
            }
        }
    }
}

#[test]
fn test_press_before_play_is_dropped() {
    let mut game = new_game();
    tick_until(&mut game, |state| *state == State::Launch);
    press(&mut game, Button::Action);

    // a direction pressed while the opening tiles arise is not kept for later
    press(&mut game, Button::Left);
    tick_until(&mut game, |state| *state == State::Play);

    let mut input = Input::new();
    game.tick(&mut input, FRAME);

    assert_eq!(*game.state(), State::Play);
}

#[test]
fn test_blocked_move_stays_in_play() {
    let mut game = start_playing();
    *game.board_mut() = Board::from_exponents([[1, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

    press(&mut game, Button::Left);

    assert_eq!(*game.state(), State::Play);
    assert_eq!(game.stats().moves, 0);
    assert_eq!(game.board().exponents()[0], [1, 2, 0, 0]);
}

#[test]
fn test_locked_board_ignores_every_direction() {
    let mut game = start_playing();
    let rows = [[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]];
    *game.board_mut() = Board::from_exponents(rows);

    for button in Button::DIRECTIONS {
        press(&mut game, button);

        assert_eq!(*game.state(), State::Play);
        assert_eq!(game.board().exponents(), rows);
    }

    assert_eq!(game.stats().score, 0);
}

#[test]
fn test_move_slides_spawns_and_returns_to_play() {
    let mut game = start_playing();
    *game.board_mut() = Board::from_exponents([[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]);

    press(&mut game, Button::Left);
    assert_eq!(*game.state(), State::Sliding);
    assert_eq!(game.stats().score, 4);

    tick_until(&mut game, |state| matches!(state, State::Spawn { .. }));
    assert_eq!(game.stats().moves, 1);
    assert_eq!(game.board().occupied_cells(), 1);

    tick_until(&mut game, |state| *state == State::Play);
    assert_eq!(game.board().occupied_cells(), 2);
    assert_eq!(game.board().exponents()[0][0], 2);
    assert_eq!(game.stats().highest, 2);
}

#[test]
fn test_making_2048_asks_for_rainbow() {
    let mut game = start_playing();
    *game.board_mut() = Board::from_exponents([[10, 10, 0, 0], [0; 4], [0; 4], [0; 4]]);

    press(&mut game, Button::Left);

    let events: Vec<GameEvent> = game.drain_events().collect();
    assert_eq!(events, vec![GameEvent::Rainbow]);
    assert_eq!(game.stats().score, 2048);
}

/// Merging the sevens leaves exactly one free cell, and nothing next to it can merge.
fn nearly_lost_board() -> Board {
    Board::from_exponents([
        [7, 7, 4, 5],
        [9, 10, 9, 3],
        [10, 9, 10, 9],
        [9, 10, 9, 10],
    ])
}

#[test]
fn test_full_board_with_a_merge_left_keeps_playing() {
    let mut game = start_playing();
    *game.board_mut() = Board::from_exponents([
        [7, 7, 4, 5],
        [9, 10, 5, 3],
        [10, 9, 10, 9],
        [9, 10, 9, 10],
    ]);

    press(&mut game, Button::Left);
    tick_until(&mut game, |state| *state == State::Play);

    assert_eq!(game.board().free_cells(), 0);
    assert!(game.board().is_squeezable());
    assert_eq!(game.drain_events().count(), 0);
}

#[test]
fn test_locked_board_ends_the_game_and_saves() {
    let mut game = start_playing();
    *game.board_mut() = nearly_lost_board();

    press(&mut game, Button::Left);
    tick_until(&mut game, |state| matches!(state, State::Lost { .. }));

    assert_eq!(game.board().free_cells(), 0);
    assert_eq!(game.stats().score, 256);
    assert_eq!(game.high_score(), 0);

    let mut input = Input::new();
    game.tick(&mut input, Duration::from_millis(1000));
    assert!(matches!(game.state(), State::Lost { .. }));

    game.tick(&mut input, Duration::from_millis(1000));
    assert_eq!(*game.state(), State::GameOver);
    assert!(game.is_over());
    assert_eq!(game.high_score(), 256);

    let events: Vec<GameEvent> = game.drain_events().collect();
    assert_eq!(events, vec![GameEvent::Flash, GameEvent::Fade]);

    let committed = game.storage().committed();
    let record = &committed[RECORD_OFFSET..RECORD_OFFSET + RECORD_SIZE];
    assert_eq!(record, &[b'2', b'0', b'4', b'8', 0, 1]);

    let reloaded = Game::new(
        MemoryStorage::from_bytes(committed.to_vec()),
        TEST_SEED,
        Timings::default(),
    );
    assert_eq!(reloaded.high_score(), 256);
}

#[test]
fn test_lower_score_keeps_high_score() {
    let mut bytes = vec![0xFF; 64];
    bytes[RECORD_OFFSET..RECORD_OFFSET + RECORD_SIZE].copy_from_slice(&[b'2', b'0', b'4', b'8', 0xE8, 0x03]);

    let mut game = Game::new(MemoryStorage::from_bytes(bytes.clone()), TEST_SEED, Timings::default());
    assert_eq!(game.high_score(), 1000);

    tick_until(&mut game, |state| *state == State::Launch);
    press(&mut game, Button::Action);
    tick_until(&mut game, |state| *state == State::Play);

    *game.board_mut() = nearly_lost_board();
    press(&mut game, Button::Left);
    tick_until(&mut game, |state| *state == State::GameOver);

    assert_eq!(game.high_score(), 1000);
    assert_eq!(game.storage().committed(), &bytes[..]);
}

#[test]
fn test_action_on_game_over_starts_again() {
    let mut game = start_playing();
    *game.board_mut() = nearly_lost_board();

    press(&mut game, Button::Left);
    tick_until(&mut game, |state| *state == State::GameOver);
    game.drain_events().for_each(drop);

    assert_eq!(game.board().occupied_cells(), 0);

    let mut input = Input::new();
    game.tick(&mut input, FRAME);
    assert_eq!(*game.state(), State::GameOver);

    press(&mut game, Button::Action);
    assert_eq!(*game.state(), State::Start);

    let events: Vec<GameEvent> = game.drain_events().collect();
    assert_eq!(events, vec![GameEvent::Fade]);

    tick_until(&mut game, |state| *state == State::Play);
    assert_eq!(game.board().occupied_cells(), 2);
    assert_eq!(game.stats().score, 0);
    assert_eq!(game.stats().moves, 0);
    assert_eq!(game.high_score(), 256);
}

#[test]
fn test_same_seed_plays_the_same_game() {
    let a = start_playing();
    let b = start_playing();

    assert_eq!(a.board().exponents(), b.board().exponents());
}
