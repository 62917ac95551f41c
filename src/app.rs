//! App: terminal init, main loop, tick and key handling.

use crate::game::{GameState, TickOutcome};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::timestep::FixedTimestep;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use std::fmt;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Without key-release reporting, soft drop ends this long after the last Down press or
/// auto-repeat.
const SOFT_DROP_RELEASE_MS: u64 = 550;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Totals printed after the terminal is restored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub score: u32,
    pub lines: u32,
    pub pieces: u32,
    pub games: u32,
    pub ticks: u64,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        let rate = if secs > 0.0 { self.ticks as f64 / secs } else { 0.0 };
        write!(
            f,
            "Score: {} | Lines: {} | Pieces: {} | Games: {} | {} ticks in {:.1}s ({:.1} ticks/s)",
            self.score, self.lines, self.pieces, self.games, self.ticks, secs, rate
        )
    }
}

pub struct App {
    args: Args,
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    timestep: FixedTimestep,
    frame_interval: Duration,
    started: Instant,
    last_frame: Instant,
    /// Terminal reports key releases (keyboard enhancement active).
    release_events: bool,
    /// Last Down press while soft drop is held.
    soft_drop_pressed_at: Option<Instant>,
    /// Ticks from games already finished and restarted.
    finished_ticks: u64,
    games: u32,
    /// TachyonFX fade for the game-over board (created when the fade starts).
    game_over_effect: Option<Effect>,
    /// Last time we processed the game-over effect (for delta).
    game_over_effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Self {
        let state = GameState::new(&config);
        let now = Instant::now();
        Self {
            timestep: FixedTimestep::new(args.tick_rate),
            frame_interval: Duration::from_secs_f64(1.0 / args.frame_rate),
            args,
            theme,
            state,
            screen: Screen::Playing,
            paused: false,
            started: now,
            last_frame: now,
            release_events: false,
            soft_drop_pressed_at: None,
            finished_ticks: 0,
            games: 1,
            game_over_effect: None,
            game_over_effect_process_time: None,
        }
    }

    fn reset_game(&mut self) {
        self.finished_ticks += self.state.ticks;
        self.games += 1;
        self.state.restart();
        self.screen = Screen::Playing;
        self.paused = false;
        self.timestep.reset();
        self.soft_drop_pressed_at = None;
        self.game_over_effect = None;
        self.game_over_effect_process_time = None;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.state.score,
            lines: self.state.lines_cleared,
            pieces: self.state.pieces_locked,
            games: self.games,
            ticks: self.finished_ticks + self.state.ticks,
            elapsed: self.started.elapsed(),
        }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                supports_keyboard_enhancement,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Key releases end soft drop; without them we fall back to a hold timeout.
        self.release_events = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        // Restore
        if self.release_events {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result.map(|()| self.summary())
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.started = Instant::now();
        self.last_frame = self.started;
        loop {
            // Input first, then simulation, then draw.
            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) == Flow::Quit {
                        return Ok(());
                    }
                }
            }

            let now = Instant::now();
            self.expire_soft_drop(now);
            let elapsed = now.saturating_duration_since(self.last_frame);
            self.last_frame = now;
            self.step(elapsed);

            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.paused,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_process_time,
                    now,
                    self.args.no_animation,
                )
            })?;

            // Sleep out the rest of the frame; a key press wakes us early.
            let timeout = self.frame_interval.saturating_sub(now.elapsed());
            event::poll(timeout)?;
        }
    }

    /// Run the simulation ticks owed for `elapsed` wall time.
    fn step(&mut self, elapsed: Duration) {
        if self.screen != Screen::Playing || self.paused {
            self.timestep.reset();
            return;
        }
        for _ in 0..self.timestep.advance(elapsed) {
            if self.state.tick() == TickOutcome::GameOver {
                self.screen = Screen::GameOver;
                self.soft_drop_pressed_at = None;
                break;
            }
        }
    }

    fn expire_soft_drop(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        if let Some(at) = self.soft_drop_pressed_at {
            if now.saturating_duration_since(at) >= Duration::from_millis(SOFT_DROP_RELEASE_MS) {
                self.soft_drop_pressed_at = None;
                self.state.set_soft_drop(false);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let action = key_to_action(key);
        if key.kind == KeyEventKind::Release {
            if action == Action::SoftDrop {
                self.soft_drop_pressed_at = None;
                self.state.set_soft_drop(false);
            }
            return Flow::Continue;
        }

        match self.screen {
            Screen::Playing if self.paused => match action {
                Action::Pause => self.paused = false,
                Action::Quit => return Flow::Quit,
                _ => {}
            },
            Screen::Playing => match action {
                Action::MoveLeft => {
                    self.state.move_left();
                }
                Action::MoveRight => {
                    self.state.move_right();
                }
                Action::Rotate => {
                    self.state.rotate();
                }
                Action::SoftDrop => {
                    self.soft_drop_pressed_at = Some(Instant::now());
                    self.state.set_soft_drop(true);
                }
                Action::Pause => {
                    self.paused = true;
                    self.soft_drop_pressed_at = None;
                    self.state.set_soft_drop(false);
                }
                Action::Quit => return Flow::Quit,
                Action::Restart | Action::None => {}
            },
            Screen::GameOver => match action {
                Action::Restart => self.reset_game(),
                Action::Quit => return Flow::Quit,
                _ => {}
            },
        }
        Flow::Continue
    }
}
