use crate::autoplay::{play_session, Autoplayer, SessionReport, MAX_FRAMES};
use crate::cli::{AppConfig, Mode};
use crate::game::Game;
use crate::save::{FileStorage, MemoryStorage};

#[cfg(feature = "sdl2")]
use crate::input::Input;
#[cfg(feature = "sdl2")]
use crate::render::sdl_renderer::{SdlConfig, SdlRenderer};
#[cfg(feature = "sdl2")]
use crate::render::Renderer;
#[cfg(feature = "sdl2")]
use std::time::Instant;

#[cfg(feature = "image")]
use crate::autoplay::play_session_with;
#[cfg(feature = "image")]
use crate::render::image_renderer::ImageRenderer;

#[cfg(feature = "threaded")]
use rayon::prelude::*;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::rngs::OsRng;
use rand::Rng;
use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;

pub struct GameApp {
    config: AppConfig,
}

impl GameApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let seed = self.config.seed.unwrap_or_else(|| OsRng.gen());

        info!("Using seed: {}", seed);

        match self.config.mode {
            Mode::Interactive => self.run_interactive(seed),
            Mode::Autoplay { games } => self.run_autoplay(seed, games),
        }
    }

    #[cfg(feature = "sdl2")]
    fn run_interactive(&self, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
        let storage = FileStorage::open(&self.config.save_path)?;
        let mut game = Game::new(storage, seed, self.config.settings.timings());
        let mut renderer = SdlRenderer::new(&SdlConfig {
            zoom: self.config.renderer.zoom,
            vsync: self.config.renderer.vsync,
            fullscreen: self.config.renderer.fullscreen,
        })?;
        let mut input = Input::new();
        let frame = self.config.settings.frame_duration();
        let mut last = Instant::now();

        loop {
            renderer.poll_input(&mut input);

            if renderer.should_quit() {
                break;
            }

            let now = Instant::now();
            game.tick(&mut input, now - last);
            last = now;

            for event in game.drain_events() {
                renderer.handle_event(&event)?;
            }

            game.draw(&mut renderer)?;

            let spent = now.elapsed();

            if spent < frame {
                std::thread::sleep(frame - spent);
            }
        }

        info!("High score: {}", game.high_score());
        Ok(())
    }

    #[cfg(not(feature = "sdl2"))]
    fn run_interactive(&self, _seed: u64) -> Result<(), Box<dyn std::error::Error>> {
        Err("Interactive play needs the sdl2 feature, try --autoplay".into())
    }

    fn run_autoplay(&self, seed: u64, games: usize) -> Result<(), Box<dyn std::error::Error>> {
        let progress = ProgressBar::new(games as u64);
        progress.enable_steady_tick(Duration::from_millis(200));
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len} {per_sec:>12}")?
                .progress_chars("#>-"),
        );

        let timings = self.config.settings.timings();
        let play = |index: usize| {
            let session_seed = seed.wrapping_add(index as u64);
            let mut game = Game::new(MemoryStorage::default(), session_seed, timings);
            let report = play_session(&mut game, &mut Autoplayer::new(session_seed), MAX_FRAMES);

            progress.inc(1);
            report
        };

        #[cfg(feature = "threaded")]
        let reports: Vec<SessionReport> = (0..games).into_par_iter().map(play).collect();

        #[cfg(not(feature = "threaded"))]
        let reports: Vec<SessionReport> = (0..games).map(play).collect();

        progress.finish();

        let best = reports.iter().map(|r| r.score).max().unwrap_or(0);
        let mean = reports.iter().map(|r| r.score as f64).sum::<f64>() / reports.len().max(1) as f64;

        info!("{} games, best score {}, mean score {:.1}", reports.len(), best, mean);

        let mut storage = FileStorage::open(&self.config.save_path)?;
        let mut record = crate::save::HighScore::load(&mut storage);

        if record.save_if_improved(&mut storage, best)? {
            info!("Saved high score to {}", storage.path().display());
        }

        if let Some(path) = &self.config.report_path {
            let writer = BufWriter::new(File::create(path)?);

            serde_json::to_writer_pretty(writer, &reports)?;
            info!("Wrote report to {}", path.display());
        }

        #[cfg(feature = "image")]
        if let Some(path) = &self.config.renderer.output_path {
            self.replay_to_image(seed, path)?;
        }

        Ok(())
    }

    /// Replays the first autoplay game onto an image and saves its last frame.
    #[cfg(feature = "image")]
    fn replay_to_image(&self, seed: u64, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut renderer = ImageRenderer::new(self.config.renderer.zoom);

        if let Some(font) = &self.config.renderer.font {
            renderer = renderer.with_font(font)?;
        }

        let mut game = Game::new(MemoryStorage::default(), seed, self.config.settings.timings());

        play_session_with(&mut game, &mut Autoplayer::new(seed), MAX_FRAMES, &mut renderer)?;
        renderer.save(path)?;

        info!("Saved {} after {} frames", path.display(), renderer.frames());
        Ok(())
    }
}
