// Copyright (c) 2026 oxyzenq

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color256,
    TrueColor,
}

/// Brightness ramp for one effect. Index 0 is the dimmest trail level,
/// the last index is the hottest head level.
#[derive(Clone, Debug)]
pub struct Palette {
    pub colors: Vec<Color>,
    pub bg: Option<Color>,
}

impl Palette {
    /// Maps a 0..=1 intensity onto the ramp.
    pub fn color_for(&self, level: f32) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        let last = (self.colors.len() - 1) as f32;
        let idx = (level.clamp(0.0, 1.0) * last).round() as usize;
        self.colors.get(idx).copied()
    }
}

const RAMP_STEPS: usize = 8;

/// Builds a ramp from a near-black shade of `base` up to `base`, with a
/// whitened head step for the hottest level.
pub fn build_ramp(mode: ColorMode, base: (u8, u8, u8), bg: Option<Color>) -> Palette {
    if mode == ColorMode::Mono {
        return Palette {
            colors: vec![Color::White],
            bg,
        };
    }

    let mut rgb: Vec<(u8, u8, u8)> = Vec::with_capacity(RAMP_STEPS);
    for i in 0..RAMP_STEPS - 1 {
        let t = 0.15 + 0.85 * (i as f32) / ((RAMP_STEPS - 2) as f32);
        rgb.push(scale_rgb(base, t));
    }
    rgb.push(whiten(base, 0.6));

    let colors = rgb
        .into_iter()
        .map(|(r, g, b)| match mode {
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            _ => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
        })
        .collect();

    Palette { colors, bg }
}

fn scale_rgb((r, g, b): (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    (lerp_u8(0, r, t), lerp_u8(0, g, t), lerp_u8(0, b, t))
}

fn whiten((r, g, b): (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    (lerp_u8(r, 255, t), lerp_u8(g, 255, t), lerp_u8(b, 255, t))
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    dr * dr + dg * dg + db * db
}

/// Nearest 256-color index, picking whichever of the 6x6x6 cube and the
/// grayscale band is closer.
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(
        r,
        g,
        b,
        CUBE[r6 as usize],
        CUBE[g6 as usize],
        CUBE[b6 as usize],
    );

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let gv = match gray_idx {
        16 => 0,
        231 => 255,
        v => 8 + 10 * (v - 232),
    };
    let gray_dist = dist2(r, g, b, gv, gv, gv);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = std::env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}
