//! Yeetris: classic falling-block puzzle game in the terminal.

mod app;
mod controller;
mod game;
mod input;
mod pieces;
mod playfield;
mod scoring;
mod theme;
mod timestep;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that affect the simulation (gravity cadence, piece sequence).
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Ticks between gravity steps.
    pub gravity_ticks: u32,
    /// Ticks between gravity steps while soft drop is held.
    pub soft_drop_ticks: u32,
    /// Seed for the piece picker; OS entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity_ticks: 30,
            soft_drop_ticks: 2,
            seed: None,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette)?;
    let config = GameConfig {
        gravity_ticks: args.gravity_ticks,
        soft_drop_ticks: args.soft_drop_ticks,
        seed: args.seed,
    };
    let mut app = App::new(args, config, theme);
    let summary = app.run()?;
    println!("{summary}");
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "yeetris",
    version,
    about = "Classic falling-block puzzle in the terminal. Fill rows to clear them; the game ends when a new piece cannot spawn.",
    long_about = "Yeetris is a small falling-block puzzle game.\n\n\
        Pieces fall on a fixed cadence. Complete a horizontal row to clear it; clearing \
        1/2/3/4 rows with one piece scores 100/300/500/800.\n\n\
        CONTROLS:\n  Left/h  Move left    Right/l  Move right    Up/k  Rotate\n  \
        Down/j  Soft drop (hold)    P  Pause    Q / Esc  Quit    R  Restart after game over"
)]
pub struct Args {
    /// Simulation ticks per second.
    #[arg(long, default_value = "60", value_name = "HZ", value_parser = parse_rate)]
    pub tick_rate: f64,

    /// Ticks between gravity steps.
    #[arg(long, default_value = "30", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub gravity_ticks: u32,

    /// Ticks between gravity steps while soft drop is held.
    #[arg(long, default_value = "2", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub soft_drop_ticks: u32,

    /// Target render frames per second.
    #[arg(long, default_value = "60", value_name = "FPS", value_parser = parse_rate)]
    pub frame_rate: f64,

    /// Seed for the piece sequence (same seed, same pieces).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]="value"). Uses the classic colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the game-over fade.
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

/// Accepted range for `--tick-rate` and `--frame-rate`, in Hz.
const RATE_RANGE: std::ops::RangeInclusive<f64> = 0.1..=1000.0;

/// Rate in Hz within `RATE_RANGE`; the period must fit a `Duration`.
fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if RATE_RANGE.contains(&rate) {
        Ok(rate)
    } else {
        Err(format!(
            "rate must be between {} and {} Hz, got {s}",
            RATE_RANGE.start(),
            RATE_RANGE.end()
        ))
    }
}
