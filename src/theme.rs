// Copyright (c) 2026 oxyzenq

use std::time::Duration;

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Rain parameters fixed for the lifetime of one mount. A theme switch
/// goes through a full restart, never a mid-run mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainTuning {
    pub glyph_size: f32,
    pub tick: Duration,
    pub base_rgb: (u8, u8, u8),
    pub bg: Option<Color>,
    pub glow: bool,
}

impl RainTuning {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                glyph_size: 18.0,
                tick: Duration::from_millis(35),
                base_rgb: (0, 255, 65),
                bg: Some(Color::Black),
                glow: true,
            },
            // The web original paints black-on-black under a translucent
            // page layer; on a terminal that maps to a gray ramp over the
            // default background, larger glyph spacing, faster tick.
            Theme::Light => Self {
                glyph_size: 22.0,
                tick: Duration::from_millis(28),
                base_rgb: (220, 220, 220),
                bg: None,
                glow: false,
            },
        }
    }
}

pub fn parse_theme(s: &str) -> Result<Theme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        _ => Err(format!("invalid theme: {} (allowed: dark, light)", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_theme_is_slow_and_dense() {
        let t = RainTuning::for_theme(Theme::Dark);
        assert_eq!(t.glyph_size, 18.0);
        assert_eq!(t.tick, Duration::from_millis(35));
        assert!(t.glow);
    }

    #[test]
    fn light_theme_is_fast_and_sparse() {
        let t = RainTuning::for_theme(Theme::Light);
        assert_eq!(t.glyph_size, 22.0);
        assert_eq!(t.tick, Duration::from_millis(28));
        assert!(!t.glow);
    }

    #[test]
    fn parse_theme_rejects_unknown() {
        assert_eq!(parse_theme(" DARK "), Ok(Theme::Dark));
        assert!(parse_theme("sepia").is_err());
    }
}
