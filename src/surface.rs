// Copyright (c) 2026 oxyzenq

use crate::frame::{Cell, Frame};
use crate::palette::Palette;

// Simulators address the surface in pixel units so tunings like "18 px
// glyphs" keep their meaning; one terminal cell covers this many pixels.
pub const CELL_W_PX: f32 = 9.0;
pub const CELL_H_PX: f32 = 18.0;

// Trail levels below this are dropped instead of lingering forever.
const MIN_LEVEL: f32 = 0.04;

const SHADE_RAMP: [char; 5] = ['·', '░', '▒', '▓', '█'];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Plot {
    ch: Option<char>,
    level: f32,
}

/// 2-D drawing surface over a terminal cell grid. Every cell carries an
/// intensity in 0..=1 and optionally a concrete glyph; `fade` decays the
/// whole grid, which is what makes trails work.
#[derive(Clone, Debug)]
pub struct Surface {
    cols: u16,
    lines: u16,
    plots: Vec<Plot>,
}

impl Surface {
    /// Returns `None` when there is nothing to draw on. Decorative
    /// output is not worth an error path beyond that.
    pub fn acquire(cols: u16, lines: u16) -> Option<Self> {
        if cols == 0 || lines == 0 {
            return None;
        }
        Some(Self {
            cols,
            lines,
            plots: vec![Plot::default(); cols as usize * lines as usize],
        })
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * CELL_W_PX
    }

    pub fn height(&self) -> f32 {
        self.lines as f32 * CELL_H_PX
    }

    fn plot(&mut self, cx: i32, cy: i32, ch: Option<char>, level: f32) {
        if cx < 0 || cy < 0 || cx >= self.cols as i32 || cy >= self.lines as i32 {
            return;
        }
        let idx = cy as usize * self.cols as usize + cx as usize;
        let p = &mut self.plots[idx];
        if level > p.level {
            p.level = level.min(1.0);
        }
        if ch.is_some() {
            p.ch = ch;
        }
    }

    fn cell_of(x: f32, y: f32) -> (i32, i32) {
        ((x / CELL_W_PX).floor() as i32, (y / CELL_H_PX).floor() as i32)
    }

    /// Translucent-black overlay: decays every intensity by `alpha`.
    pub fn fade(&mut self, alpha: f32) {
        let keep = (1.0 - alpha).clamp(0.0, 1.0);
        for p in &mut self.plots {
            p.level *= keep;
            if p.level < MIN_LEVEL {
                *p = Plot::default();
            }
        }
    }

    pub fn glyph(&mut self, ch: char, x: f32, y: f32, opacity: f32, glow: bool) {
        let (cx, cy) = Self::cell_of(x, y);
        self.plot(cx, cy, Some(ch), opacity);
        if glow {
            let halo = opacity * 0.25;
            self.plot(cx - 1, cy, None, halo);
            self.plot(cx + 1, cy, None, halo);
            self.plot(cx, cy - 1, None, halo);
            self.plot(cx, cy + 1, None, halo);
        }
    }

    /// Round-cap stroke sampled at half-cell steps. `halo` is a glow
    /// radius in pixels; zero disables it.
    #[allow(clippy::too_many_arguments)]
    pub fn line(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        opacity: f32,
        halo: f32,
    ) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();
        let steps = ((length / (CELL_W_PX.min(CELL_H_PX) * 0.5)).ceil() as usize).max(1);

        let thick = width >= CELL_W_PX;
        let halo_level = (halo * 0.01 * opacity).min(0.3);

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (cx, cy) = Self::cell_of(x0 + dx * t, y0 + dy * t);
            self.plot(cx, cy, None, opacity);
            if thick {
                self.plot(cx - 1, cy, None, opacity * 0.8);
                self.plot(cx + 1, cy, None, opacity * 0.8);
            }
            if halo_level >= MIN_LEVEL {
                self.plot(cx - 1, cy, None, halo_level);
                self.plot(cx + 1, cy, None, halo_level);
                self.plot(cx, cy - 1, None, halo_level);
                self.plot(cx, cy + 1, None, halo_level);
            }
        }
    }

    pub fn disc(&mut self, x: f32, y: f32, radius: f32, opacity: f32) {
        let (cx0, cy0) = Self::cell_of(x - radius, y - radius);
        let (cx1, cy1) = Self::cell_of(x + radius, y + radius);
        for cy in cy0..=cy1 {
            for cx in cx0..=cx1 {
                let px = (cx as f32 + 0.5) * CELL_W_PX;
                let py = (cy as f32 + 0.5) * CELL_H_PX;
                let dx = px - x;
                let dy = py - y;
                if dx * dx + dy * dy <= radius * radius {
                    self.plot(cx, cy, None, opacity);
                }
            }
        }
    }

    /// Writes the current state into `frame`. Unchanged cells are
    /// deduplicated by `Frame::set`.
    pub fn blit(&self, frame: &mut Frame, palette: &Palette, bold_heads: bool) {
        for cy in 0..self.lines {
            for cx in 0..self.cols {
                let p = self.plots[cy as usize * self.cols as usize + cx as usize];
                let cell = if p.level <= 0.0 {
                    Cell::blank_with_bg(palette.bg)
                } else {
                    Cell {
                        ch: p.ch.unwrap_or_else(|| shade_char(p.level)),
                        fg: palette.color_for(p.level),
                        bg: palette.bg,
                        bold: bold_heads && p.level > 0.85,
                    }
                };
                frame.set(cx, cy, cell);
            }
        }
    }
}

fn shade_char(level: f32) -> char {
    let last = (SHADE_RAMP.len() - 1) as f32;
    let idx = (level.clamp(0.0, 1.0) * last).round() as usize;
    SHADE_RAMP[idx.min(SHADE_RAMP.len() - 1)]
}
