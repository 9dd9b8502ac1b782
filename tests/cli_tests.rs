#![cfg(feature = "cli")]

use game_2048::cli::{Mode, Opt, Settings};
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[test]
fn test_defaults_to_interactive() {
    let config = Opt::from_iter(["2048"]).to_app_config().unwrap();

    assert_eq!(config.mode, Mode::Interactive);
    assert_eq!(config.save_path, PathBuf::from("2048.sav"));
    assert_eq!(config.seed, None);
    assert_eq!(config.settings, Settings::default());
    assert_eq!(config.renderer.zoom, 4);
}

#[test]
fn test_autoplay_flags() {
    let opt = Opt::from_iter(["2048", "--autoplay", "25", "--seed", "9", "--scale", "2"]);
    let config = opt.to_app_config().unwrap();

    assert_eq!(config.mode, Mode::Autoplay { games: 25 });
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.renderer.zoom, 2);
}

#[test]
fn test_zero_games_is_rejected() {
    let opt = Opt::from_iter(["2048", "--autoplay", "0"]);

    assert!(opt.to_app_config().is_err());
}

#[test]
fn test_partial_settings_keep_defaults() {
    let settings: Settings = serde_json::from_str(r#"{ "lost_delay_ms": 500 }"#).unwrap();

    assert_eq!(settings.frame_rate, 60);
    assert_eq!(settings.timings().lost_delay, Duration::from_millis(500));
    assert_eq!(settings.timings().splash_delay, Duration::from_millis(1000));
    assert_eq!(settings.frame_duration(), Duration::from_secs(1) / 60);
}

#[test]
fn test_settings_file() {
    let path = std::env::temp_dir().join(format!("game-2048-settings-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "frame_rate": 30, "window_scale": 3 }"#).unwrap();

    let opt = Opt::from_iter(["2048", "--config", path.to_str().unwrap()]);
    let config = opt.to_app_config().unwrap();

    assert_eq!(config.settings.frame_rate, 30);
    assert_eq!(config.renderer.zoom, 3);

    std::fs::remove_file(&path).unwrap();
}
