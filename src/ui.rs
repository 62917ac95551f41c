//! Layout and drawing: playfield, sidebar, pause overlay, game over.

use crate::app::Screen;
use crate::controller::SpawnError;
use crate::game::GameState;
use crate::playfield::{SPAWN_BUFFER_ROWS, VISIBLE_ROWS, WIDTH};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per grid cell (square-ish blocks).
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Duration of the game-over board fade (TachyonFX) in ms.
const GAME_OVER_FADE_MS: u32 = 600;

/// Playfield size in terminal cells, border included.
fn playfield_outer_size() -> (u16, u16) {
    (WIDTH as u16 * CELL_WIDTH + 2, VISIBLE_ROWS as u16 + 2)
}

/// Smallest terminal that fits board + sidebar.
pub fn min_terminal_size() -> (u16, u16) {
    let (pw, ph) = playfield_outer_size();
    (pw + SIDEBAR_WIDTH, ph)
}

/// Centered (playfield, sidebar) rects, or `None` when the terminal is too small.
fn game_layout(area: Rect) -> Option<(Rect, Rect)> {
    let (pw, ph) = playfield_outer_size();
    let (min_w, min_h) = min_terminal_size();
    if area.width < min_w || area.height < min_h {
        return None;
    }
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(min_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    Some((inner[0], inner[1]))
}

/// Draw the current screen. On game over, fades the board with TachyonFX (unless
/// `no_animation`) and shows the result panel once the fade is done.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    paused: bool,
    game_over_effect: &mut Option<Effect>,
    game_over_process_time: &mut Option<Instant>,
    now: Instant,
    no_animation: bool,
) {
    let area = frame.area();
    let Some((playfield_area, sidebar_area)) = game_layout(area) else {
        draw_too_small(frame, theme, area);
        return;
    };

    draw_playfield(frame, state, theme, playfield_area);
    draw_sidebar(frame, state, theme, sidebar_area);

    match screen {
        Screen::Playing => {
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
        }
        Screen::GameOver => {
            let fade_done = no_animation
                || apply_game_over_effect(
                    frame,
                    theme,
                    playfield_area,
                    game_over_effect,
                    game_over_process_time,
                    now,
                );
            if fade_done {
                draw_game_over(frame, state, theme, area);
            }
        }
    }
}

/// Create or advance the board fade. Returns true once the fade has finished.
fn apply_game_over_effect(
    frame: &mut Frame,
    theme: &Theme,
    board_area: Rect,
    effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) -> bool {
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *process_time = Some(now);

    let effect = effect.get_or_insert_with(|| {
        fx::fade_to(
            theme.bg,
            theme.bg,
            (GAME_OVER_FADE_MS, Interpolation::Linear),
        )
        .with_area(board_area)
    });
    frame.render_effect(effect, board_area, TfxDuration::from_millis(delta_ms));
    effect.done()
}

fn draw_too_small(frame: &mut Frame, theme: &Theme, area: Rect) {
    let (w, h) = min_terminal_size();
    let msg = format!("Terminal too small: need {w}x{h}, have {}x{}", area.width, area.height);
    Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(theme.main_fg))))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, frame.buffer_mut());
}

fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Yeetris ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    // Row 0 is the spawn buffer and never drawn.
    for v in 0..VISIBLE_ROWS {
        let row = (v + SPAWN_BUFFER_ROWS) as i32;
        let y = inner.y + v as u16;
        if y >= inner.y + inner.height {
            break;
        }
        for col in 0..WIDTH {
            let x = inner.x + col as u16 * CELL_WIDTH;
            let (symbol, style) = match state.color_at(row, col as i32) {
                Some(id) => {
                    let c = theme.piece_color(id);
                    ("██", Style::default().fg(c).bg(theme.bg))
                }
                None => (" ·", Style::default().fg(theme.div_line).bg(theme.bg)),
            };
            buf.set_string(x, y, symbol, style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let help_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Stats
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
            Constraint::Fill(1),
        ])
        .split(area);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let speed = if state.soft_drop() {
        "soft drop".to_string()
    } else {
        format!("{} ticks/row", state.gravity_interval())
    };
    let piece = state
        .active()
        .map_or_else(|| "-".to_string(), |p| format!("{:?}", p.kind));
    let stats = Text::from(vec![
        stat("Score:  ", state.score.to_string()),
        stat("Lines:  ", state.lines_cleared.to_string()),
        stat("Pieces: ", state.pieces_locked.to_string()),
        stat("Piece:  ", piece),
        stat("Speed:  ", speed),
    ]);
    Paragraph::new(stats)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(" Stats ", title_style)),
        )
        .render(chunks[0], frame.buffer_mut());

    let controls = Text::from(vec![
        Line::from(Span::styled("←/h  move left", help_style)),
        Line::from(Span::styled("→/l  move right", help_style)),
        Line::from(Span::styled("↑/k  rotate", help_style)),
        Line::from(Span::styled("↓/j  soft drop", help_style)),
        Line::from(Span::styled("p    pause", help_style)),
        Line::from(Span::styled("q    quit", help_style)),
    ]);
    Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(" Controls ", title_style)),
        )
        .render(chunks[2], frame.buffer_mut());
}

/// Rect of `w` x `h` centered in `area`, clipped to it.
fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 6);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let popup = centered(area, 30, 11);
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", state.score), fg)),
        Line::from(Span::styled(format!(" Lines: {} ", state.lines_cleared), fg)),
        Line::from(Span::styled(format!(" Pieces: {} ", state.pieces_locked), fg)),
        match state.game_over_cause {
            // Visible rows already start at 1; columns are 0-based.
            Some(SpawnError::Blocked { row, col }) => Line::from(Span::styled(
                format!(" Blocked at row {row}, col {} ", col + 1),
                Style::default().fg(theme.inactive_fg),
            )),
            None => Line::from(""),
        },
        Line::from(Span::styled(" R — Restart    Q — Quit ", fg)),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Yeetris ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}
