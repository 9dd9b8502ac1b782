use crate::game::Timings;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

fn load_config(s: &str) -> Result<Settings, String> {
    let path = PathBuf::from(s);
    let file = File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?;
    let reader = BufReader::new(file);
    let settings = serde_json::from_reader(reader)
        .map_err(|e| format!("Failed to parse config file: {}", e))?;
    Ok(settings)
}

/// Tunables read from the JSON settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub frame_rate: u32,
    pub window_scale: u32,
    pub splash_delay_ms: u64,
    pub lost_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            window_scale: 4,
            splash_delay_ms: 1000,
            lost_delay_ms: 2000,
        }
    }
}

impl Settings {
    pub fn timings(&self) -> Timings {
        Timings {
            splash_delay: Duration::from_millis(self.splash_delay_ms),
            lost_delay: Duration::from_millis(self.lost_delay_ms),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Autoplay { games: usize },
}

#[derive(Debug)]
pub struct RendererConfig {
    pub zoom: u32,
    #[cfg(feature = "sdl2")]
    pub vsync: bool,
    #[cfg(feature = "sdl2")]
    pub fullscreen: bool,
    #[cfg(feature = "image")]
    pub output_path: Option<PathBuf>,
    #[cfg(feature = "image")]
    pub font: Option<PathBuf>,
}

#[derive(Debug)]
pub struct AppConfig {
    pub mode: Mode,
    pub settings: Settings,
    pub save_path: PathBuf,
    pub seed: Option<u64>,
    pub report_path: Option<PathBuf>,
    pub renderer: RendererConfig,
}

#[derive(Debug, StructOpt)]
#[structopt(name = "2048", about = "Slide and merge tiles until you make 2048")]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(parse(try_from_str=load_config), short, long, help = "JSON settings file")]
    config: Option<Settings>,

    #[structopt(
        parse(from_os_str),
        long,
        default_value = "2048.sav",
        help = "File holding the high score"
    )]
    save: PathBuf,

    #[structopt(parse(try_from_str), short, long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(long, help = "Play n games headless with random moves")]
    autoplay: Option<usize>,

    #[structopt(parse(from_os_str), long, help = "Write autoplay results as JSON")]
    report: Option<PathBuf>,

    #[structopt(long, help = "Pixel zoom of the 128x128 screen")]
    scale: Option<u32>,

    #[cfg(feature = "sdl2")]
    #[structopt(long, help = "Turns on vsync")]
    vsync: bool,

    #[cfg(feature = "sdl2")]
    #[structopt(short, long, help = "Runs the application in full screen")]
    fullscreen: bool,

    #[cfg(feature = "image")]
    #[structopt(parse(from_os_str), short, long, help = "Save the last autoplay frame as an image")]
    output: Option<PathBuf>,

    #[cfg(feature = "image")]
    #[structopt(parse(from_os_str), long, help = "TrueType font for image output text")]
    font: Option<PathBuf>,

    #[structopt(long, possible_values= &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self) -> Result<AppConfig, &'static str> {
        let settings = self.config.unwrap_or_default();

        if settings.frame_rate == 0 {
            return Err("Frame rate must be positive");
        }

        let mode = match self.autoplay {
            Some(0) => return Err("Autoplay needs at least one game"),
            Some(games) => Mode::Autoplay { games },
            None => Mode::Interactive,
        };

        Ok(AppConfig {
            mode,
            save_path: self.save,
            seed: self.seed,
            report_path: self.report,
            renderer: RendererConfig {
                zoom: self.scale.unwrap_or(settings.window_scale).max(1),
                #[cfg(feature = "sdl2")]
                vsync: self.vsync,
                #[cfg(feature = "sdl2")]
                fullscreen: self.fullscreen,
                #[cfg(feature = "image")]
                output_path: self.output,
                #[cfg(feature = "image")]
                font: self.font,
            },
            settings,
        })
    }
}
