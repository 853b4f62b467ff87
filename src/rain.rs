// Copyright (c) 2026 oxyzenq

use std::time::{Duration, Instant};

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

use crate::effect::Effect;
use crate::glyphs::rain_alphabet;
use crate::palette::{build_ramp, ColorMode, Palette};
use crate::surface::Surface;
use crate::theme::RainTuning;

// Chance draw above this resets an off-screen column, ~2% per tick.
const ESCAPE_CHANCE: f32 = 0.98;
// Fresh fall arrays start one row down, matching the restart look.
const DEFAULT_ROW: u32 = 1;
// Trail-fade per tick; glyphs dim over a handful of frames.
const FADE_ALPHA: f32 = 0.3;

/// One column's glyph pick for the current tick.
#[derive(Clone, Copy, Debug)]
struct Spark {
    ch: char,
    row: u32,
    alpha: f32,
}

/// Falling-glyph rain. One fall position per column; each tick draws one
/// random glyph per column at its current row, then advances or
/// probabilistically resets the column once it has run off the bottom.
pub struct Rain {
    tuning: RainTuning,
    palette: Palette,
    width: f32,
    height: f32,
    drops: Vec<u32>,
    sparks: Vec<Spark>,
    chars: Vec<char>,
    rng: StdRng,
    rand_chance: Uniform<f32>,
    rand_glyph: Uniform<usize>,
    rand_alpha: Uniform<f32>,
}

impl Rain {
    pub fn new(
        width: f32,
        height: f32,
        tuning: RainTuning,
        color_mode: ColorMode,
        seed: u64,
    ) -> Self {
        let chars = rain_alphabet();
        let columns = Self::columns_for(width, tuning.glyph_size);
        Self {
            palette: build_ramp(color_mode, tuning.base_rgb, tuning.bg),
            tuning,
            width,
            height,
            drops: vec![DEFAULT_ROW; columns],
            sparks: Vec::with_capacity(columns),
            rand_glyph: Uniform::new(0, chars.len()).expect("valid range"),
            chars,
            rng: StdRng::seed_from_u64(seed),
            rand_chance: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_alpha: Uniform::new(0.7, 1.0).expect("valid range"),
        }
    }

    fn columns_for(width: f32, glyph_size: f32) -> usize {
        (width / glyph_size).floor().max(0.0) as usize
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }
}

impl Effect for Rain {
    fn step(&mut self, _now: Instant) {
        self.sparks.clear();
        for i in 0..self.drops.len() {
            let row = self.drops[i];
            self.sparks.push(Spark {
                ch: self.chars[self.rand_glyph.sample(&mut self.rng)],
                row,
                alpha: self.rand_alpha.sample(&mut self.rng),
            });

            let y = row as f32 * self.tuning.glyph_size;
            if y > self.height && self.rand_chance.sample(&mut self.rng) > ESCAPE_CHANCE {
                self.drops[i] = 0;
            } else {
                self.drops[i] += 1;
            }
        }
    }

    fn render(&self, surface: &mut Surface) {
        surface.fade(FADE_ALPHA);
        for (i, spark) in self.sparks.iter().enumerate() {
            let x = i as f32 * self.tuning.glyph_size;
            let y = spark.row as f32 * self.tuning.glyph_size;
            surface.glyph(spark.ch, x, y, spark.alpha, self.tuning.glow);
        }
    }

    fn tick(&self) -> Duration {
        self.tuning.tick
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let columns = Self::columns_for(width, self.tuning.glyph_size);
        self.drops.clear();
        self.drops.resize(columns, DEFAULT_ROW);
        self.sparks.clear();
    }

    fn restart(&mut self, _now: Instant) {
        self.drops.fill(DEFAULT_ROW);
        self.sparks.clear();
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn bold_heads(&self) -> bool {
        self.tuning.glow
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::theme::Theme;

    fn make_rain(width: f32, height: f32, theme: Theme) -> Rain {
        Rain::new(
            width,
            height,
            RainTuning::for_theme(theme),
            ColorMode::Mono,
            7,
        )
    }

    #[test]
    fn column_count_is_width_over_glyph_size() {
        let rain = make_rain(400.0, 200.0, Theme::Dark);
        assert_eq!(rain.columns(), (400.0_f32 / 18.0).floor() as usize);
    }

    #[test]
    fn resize_recomputes_columns_and_resets_positions() {
        let mut rain = make_rain(400.0, 200.0, Theme::Dark);
        for _ in 0..10 {
            rain.step(Instant::now());
        }

        rain.resize(300.0, 200.0);
        assert_eq!(rain.columns(), (300.0_f32 / 18.0).floor() as usize);
        assert!(rain.drops.iter().all(|&r| r == DEFAULT_ROW));
    }

    #[test]
    fn fall_is_monotonic_and_resets_only_past_the_bottom() {
        // Short canvas so columns overshoot quickly; enough ticks for the
        // 2% escape draw to fire many times.
        let mut rain = make_rain(180.0, 3.0 * 18.0, Theme::Dark);
        let g = rain.tuning.glyph_size;

        let mut resets = 0usize;
        for _ in 0..2000 {
            let before = rain.drops.clone();
            rain.step(Instant::now());
            for (i, (&prev, &next)) in before.iter().zip(rain.drops.iter()).enumerate() {
                if next < prev {
                    assert_eq!(next, 0, "column {i} reset somewhere other than row 0");
                    assert!(
                        prev as f32 * g > rain.height,
                        "column {i} reset while still on screen"
                    );
                    resets += 1;
                } else {
                    assert_eq!(next, prev + 1, "column {i} skipped a row");
                }
            }
        }
        assert!(resets > 0, "escape draw never fired in 2000 ticks");
    }

    #[test]
    fn sparks_come_from_the_fixed_alphabet() {
        let mut rain = make_rain(360.0, 200.0, Theme::Dark);
        rain.step(Instant::now());
        assert_eq!(rain.sparks.len(), rain.columns());
        for spark in &rain.sparks {
            assert!(rain.chars.contains(&spark.ch));
            assert!((0.7..1.0).contains(&spark.alpha));
        }
    }

    #[test]
    fn theme_switch_means_new_tick_glyph_size_and_columns() {
        let dark = make_rain(440.0, 200.0, Theme::Dark);
        let light = make_rain(440.0, 200.0, Theme::Light);

        assert_eq!(dark.tick(), Duration::from_millis(35));
        assert_eq!(light.tick(), Duration::from_millis(28));
        assert_eq!(dark.columns(), (440.0_f32 / 18.0).floor() as usize);
        assert_eq!(light.columns(), (440.0_f32 / 22.0).floor() as usize);
        assert!(light.drops.iter().all(|&r| r == DEFAULT_ROW));
    }

    #[test]
    fn render_paints_one_glyph_per_column() {
        let mut rain = make_rain(9.0 * 18.0, 200.0, Theme::Dark);
        let mut surface = Surface::acquire(18, 12).unwrap();
        rain.step(Instant::now());
        rain.render(&mut surface);

        let mut frame = crate::frame::Frame::new(18, 12, None);
        surface.blit(&mut frame, rain.palette(), false);
        let drawn = (0..12)
            .flat_map(|y| (0..18).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get(x, y).map(|c| c.ch != ' ').unwrap_or(false))
            .count();
        assert!(drawn >= rain.columns());
    }
}
