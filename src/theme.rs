//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Theme-file keys for the seven piece colours, in catalog order.
const PIECE_KEYS: [&str; 7] = [
    "piece_i", "piece_j", "piece_l", "piece_o", "piece_s", "piece_t", "piece_z",
];

/// Classic piece colours: cyan, blue, orange, yellow, green, purple, red.
const CLASSIC_PIECES: [Color; 7] = [
    Color::Rgb(0, 255, 255),
    Color::Rgb(0, 0, 255),
    Color::Rgb(255, 165, 0),
    Color::Rgb(255, 255, 0),
    Color::Rgb(0, 255, 0),
    Color::Rgb(128, 0, 128),
    Color::Rgb(255, 0, 0),
];

/// Piece and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Piece colours indexed by colour id - 1.
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid dots and borders.
    pub div_line: Color,
    /// Text (score, lines).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (controls help).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// Classic piece colours on a dark slate board.
    pub fn classic() -> Self {
        Self {
            pieces: CLASSIC_PIECES,
            bg: Color::Rgb(0x1E, 0x22, 0x2A),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xFF, 0xFF, 0xFF),
            title: Color::Rgb(0x56, 0x81, 0xA3),
            inactive_fg: Color::Rgb(0xD3, 0xD3, 0xD3),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the classic theme if `path` is None or the file does not exist.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))?
            }
            _ => Self::classic(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.pieces = [
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0x00),
                ];
                self.bg = Color::Rgb(0, 0, 0);
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito style set: no pair relies on red/green alone.
                self.pieces = [
                    Color::Rgb(0x56, 0xB4, 0xE9),
                    Color::Rgb(0x00, 0x72, 0xB2),
                    Color::Rgb(0xE6, 0x9F, 0x00),
                    Color::Rgb(0xF0, 0xE4, 0x42),
                    Color::Rgb(0x00, 0x9E, 0x73),
                    Color::Rgb(0xCC, 0x79, 0xA7),
                    Color::Rgb(0xD5, 0x5E, 0x00),
                ];
            }
        }
    }

    /// Missing keys keep their classic value; a present key with a bad hex value is an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let classic = Self::classic();
        let get = |key: &str, fallback: Color| -> Result<Color, ThemeError> {
            map.get(key).map_or(Ok(fallback), |v| parse_hex(v))
        };
        let mut pieces = classic.pieces;
        for (slot, key) in pieces.iter_mut().zip(PIECE_KEYS) {
            *slot = get(key, *slot)?;
        }
        Ok(Self {
            pieces,
            bg: get("meter_bg", classic.bg)?,
            div_line: get("div_line", classic.div_line)?,
            main_fg: get("main_fg", classic.main_fg)?,
            title: get("title", classic.title)?,
            inactive_fg: get("inactive_fg", classic.inactive_fg)?,
        })
    }

    /// Colour for a locked-cell colour id (1..=7). Unknown ids draw in the text colour.
    #[inline]
    pub fn piece_color(&self, color_id: u8) -> Color {
        usize::from(color_id)
            .checked_sub(1)
            .and_then(|i| self.pieces.get(i))
            .copied()
            .unwrap_or(self.main_fg)
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |digits: &str, scale: u8| {
        u8::from_str_radix(digits, 16)
            .map(|v| v * scale)
            .map_err(|_| invalid())
    };
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2], 1)?, channel(&s[2..4], 1)?, channel(&s[4..6], 1)?),
        3 => (channel(&s[0..1], 17)?, channel(&s[1..2], 17)?, channel(&s[2..3], 17)?),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
