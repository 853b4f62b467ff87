// Copyright (c) 2026 oxyzenq

use std::f32::consts::{FRAC_PI_2, PI};
use std::time::{Duration, Instant};

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

use crate::effect::Effect;
use crate::palette::{build_ramp, ColorMode, Palette};
use crate::surface::Surface;

const MAX_GENERATION: u8 = 6;
const ROOT_COUNT: usize = 3;
const ROOT_WIDTH: f32 = 8.0;
const GROWTH_SPEED: f32 = 2.0;
// 40% of completed branches stay terminal leaves.
const SPAWN_CHANCE: f32 = 0.6;
const RESTART_DELAY: Duration = Duration::from_millis(2000);
const GROVE_TICK: Duration = Duration::from_micros(16_667);
// Slower trail fade than the rain, branches linger.
const FADE_ALPHA: f32 = 0.08;

const GROVE_RGB: (u8, u8, u8) = (0, 255, 65);

#[derive(Clone, Copy, Debug)]
struct Branch {
    x: f32,
    y: f32,
    angle: f32,
    target_len: f32,
    width: f32,
    generation: u8,
    current_len: f32,
    growing: bool,
}

impl Branch {
    fn tip(&self) -> (f32, f32) {
        (
            self.x + self.angle.cos() * self.current_len,
            self.y + self.angle.sin() * self.current_len,
        )
    }
}

/// The branch set either still has growing members or is settled and
/// waiting out the restart delay.
#[derive(Clone, Copy, Debug)]
enum Phase {
    Growing,
    Settling { restart_at: Instant },
}

/// Procedurally grown branching structure. Roots sprout from below the
/// bottom edge, children spawn at completed parents' tips, and the whole
/// set is replaced a fixed delay after the last branch stops growing.
pub struct Grove {
    width: f32,
    height: f32,
    branches: Vec<Branch>,
    phase: Phase,
    palette: Palette,
    rng: StdRng,
    rand_unit: Uniform<f32>,
    rand_children: Uniform<u8>,
}

impl Grove {
    pub fn new(width: f32, height: f32, color_mode: ColorMode, seed: u64) -> Self {
        let mut grove = Self {
            width,
            height,
            branches: Vec::new(),
            phase: Phase::Growing,
            palette: build_ramp(
                color_mode,
                GROVE_RGB,
                Some(crossterm::style::Color::Black),
            ),
            rng: StdRng::seed_from_u64(seed),
            rand_unit: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_children: Uniform::new_inclusive(2, 3).expect("valid range"),
        };
        grove.seed_roots();
        grove
    }

    fn unit(&mut self) -> f32 {
        self.rand_unit.sample(&mut self.rng)
    }

    fn seed_roots(&mut self) {
        self.branches.clear();
        for _ in 0..ROOT_COUNT {
            let x = self.unit() * self.width;
            let angle = -FRAC_PI_2 + (self.unit() - 0.5) * 0.8;
            let target_len = 80.0 + self.unit() * 40.0;
            self.branches.push(Branch {
                x,
                y: self.height + 50.0,
                angle,
                target_len,
                width: ROOT_WIDTH,
                generation: 0,
                current_len: 0.0,
                growing: true,
            });
        }
        self.phase = Phase::Growing;
    }

    /// 2-3 children at the parent's tip, one generation deeper. A parent
    /// at the generation cap gets none.
    fn children_of(&mut self, parent: Branch) -> Vec<Branch> {
        if parent.generation >= MAX_GENERATION {
            return Vec::new();
        }

        let (tip_x, tip_y) = parent.tip();
        let count = self.rand_children.sample(&mut self.rng);
        let mut children = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let angle = parent.angle + (self.unit() - 0.5) * (PI / 2.0);
            let target_len = parent.target_len * (0.6 + self.unit() * 0.2);
            children.push(Branch {
                x: tip_x,
                y: tip_y,
                angle,
                target_len,
                width: parent.width * 0.7,
                generation: parent.generation + 1,
                current_len: 0.0,
                growing: true,
            });
        }
        children
    }
}

impl Effect for Grove {
    fn step(&mut self, now: Instant) {
        if let Phase::Settling { restart_at } = self.phase {
            if now >= restart_at {
                self.seed_roots();
            }
            return;
        }

        let mut spawned: Vec<Branch> = Vec::new();
        for i in 0..self.branches.len() {
            if !self.branches[i].growing {
                continue;
            }
            let b = &mut self.branches[i];
            b.current_len += GROWTH_SPEED;
            if b.current_len >= b.target_len {
                b.current_len = b.target_len;
                b.growing = false;
                let parent = *b;
                if self.unit() > 1.0 - SPAWN_CHANCE {
                    spawned.extend(self.children_of(parent));
                }
            }
        }
        self.branches.extend(spawned);

        if !self.branches.is_empty() && self.branches.iter().all(|b| !b.growing) {
            self.phase = Phase::Settling {
                restart_at: now + RESTART_DELAY,
            };
        }
    }

    fn render(&self, surface: &mut Surface) {
        surface.fade(FADE_ALPHA);
        for b in &self.branches {
            if b.current_len <= 0.0 {
                continue;
            }
            let (tip_x, tip_y) = b.tip();
            let opacity = (1.0 - b.generation as f32 * 0.15).max(0.3);
            let halo = 15.0 + (MAX_GENERATION - b.generation) as f32 * 3.0;
            surface.line(b.x, b.y, tip_x, tip_y, b.width, opacity, halo);
            if b.current_len == b.target_len {
                surface.disc(tip_x, tip_y, b.width * 1.5, opacity * 0.6);
            }
        }
    }

    fn tick(&self) -> Duration {
        GROVE_TICK
    }

    /// Cancels any pending restart and re-roots at the new size.
    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.seed_roots();
    }

    fn restart(&mut self, _now: Instant) {
        self.seed_roots();
    }

    fn defer(&mut self, by: Duration) {
        if let Phase::Settling { restart_at } = &mut self.phase {
            *restart_at += by;
        }
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_grove() -> Grove {
        Grove::new(800.0, 400.0, ColorMode::Mono, 42)
    }

    /// Steps until the set settles; panics if it never does.
    fn grow_to_settled(grove: &mut Grove, now: Instant) {
        for _ in 0..10_000 {
            grove.step(now);
            if matches!(grove.phase, Phase::Settling { .. }) {
                return;
            }
        }
        panic!("grove never settled");
    }

    #[test]
    fn roots_start_below_the_bottom_edge_pointing_up() {
        let grove = make_grove();
        assert_eq!(grove.branches.len(), ROOT_COUNT);
        for b in &grove.branches {
            assert_eq!(b.generation, 0);
            assert_eq!(b.current_len, 0.0);
            assert_eq!(b.y, grove.height + 50.0);
            assert!((0.0..grove.width).contains(&b.x));
            assert!((b.angle + FRAC_PI_2).abs() <= 0.4 + 1e-6);
            assert!((80.0..120.0).contains(&b.target_len));
            assert_eq!(b.width, ROOT_WIDTH);
        }
    }

    #[test]
    fn generation_never_exceeds_the_cap() {
        let mut grove = make_grove();
        let mut now = Instant::now();
        // Run through several full grow/settle/restart cycles.
        for _ in 0..5000 {
            grove.step(now);
            now += Duration::from_millis(100);
            for b in &grove.branches {
                assert!(b.generation <= MAX_GENERATION);
            }
        }
    }

    #[test]
    fn capped_parents_spawn_no_children() {
        let mut grove = make_grove();
        let parent = Branch {
            x: 10.0,
            y: 10.0,
            angle: -FRAC_PI_2,
            target_len: 50.0,
            width: 1.0,
            generation: MAX_GENERATION,
            current_len: 50.0,
            growing: false,
        };
        assert!(grove.children_of(parent).is_empty());
    }

    #[test]
    fn children_shrink_and_deepen() {
        let mut grove = make_grove();
        let parent = Branch {
            x: 100.0,
            y: 100.0,
            angle: -FRAC_PI_2,
            target_len: 100.0,
            width: 8.0,
            generation: 2,
            current_len: 100.0,
            growing: false,
        };
        let children = grove.children_of(parent);
        assert!((2..=3).contains(&children.len()));
        for c in &children {
            assert_eq!(c.generation, 3);
            assert!((60.0..80.0).contains(&c.target_len));
            assert!((c.width - 8.0 * 0.7).abs() < 1e-6);
            assert!((c.angle - parent.angle).abs() <= PI / 4.0 + 1e-6);
            // Children sprout from the parent's tip.
            let (tx, ty) = parent.tip();
            assert_eq!((c.x, c.y), (tx, ty));
            assert!(c.growing);
            assert_eq!(c.current_len, 0.0);
        }
    }

    #[test]
    fn growth_clamps_at_target_and_stays_complete() {
        let mut grove = make_grove();
        let now = Instant::now();

        let mut completed: Vec<(f32, f32)> = Vec::new();
        for _ in 0..300 {
            grove.step(now);
            for b in &grove.branches {
                assert!(b.current_len <= b.target_len + 1e-4);
                if !b.growing {
                    assert_eq!(b.current_len, b.target_len);
                }
            }
            if matches!(grove.phase, Phase::Settling { .. }) {
                completed = grove.branches.iter().map(|b| (b.current_len, b.target_len)).collect();
                break;
            }
        }
        assert!(!completed.is_empty());

        // Completed branches never resume growing before the restart.
        grove.step(now);
        assert!(grove.branches.iter().all(|b| !b.growing));
    }

    #[test]
    fn settled_set_restarts_after_the_delay() {
        let mut grove = make_grove();
        let now = Instant::now();
        grow_to_settled(&mut grove, now);
        let Phase::Settling { restart_at } = grove.phase else {
            unreachable!();
        };
        assert_eq!(restart_at, now + RESTART_DELAY);

        // Just before the deadline nothing changes.
        grove.step(restart_at - Duration::from_millis(1));
        assert!(matches!(grove.phase, Phase::Settling { .. }));

        grove.step(restart_at);
        assert_eq!(grove.branches.len(), ROOT_COUNT);
        for b in &grove.branches {
            assert_eq!(b.generation, 0);
            assert_eq!(b.current_len, 0.0);
            assert!(b.growing);
        }
    }

    #[test]
    fn resize_cancels_a_pending_restart() {
        let mut grove = make_grove();
        let now = Instant::now();
        grow_to_settled(&mut grove, now);

        grove.resize(600.0, 300.0);
        assert!(matches!(grove.phase, Phase::Growing));
        assert_eq!(grove.branches.len(), ROOT_COUNT);
        assert!(grove.branches.iter().all(|b| b.y == 300.0 + 50.0));
    }

    #[test]
    fn defer_pushes_the_restart_deadline() {
        let mut grove = make_grove();
        let now = Instant::now();
        grow_to_settled(&mut grove, now);
        let Phase::Settling { restart_at } = grove.phase else {
            unreachable!();
        };

        grove.defer(Duration::from_secs(5));
        grove.step(restart_at + Duration::from_secs(1));
        assert!(matches!(grove.phase, Phase::Settling { .. }));

        grove.step(restart_at + Duration::from_secs(6));
        assert!(matches!(grove.phase, Phase::Growing));
    }

    #[test]
    fn render_marks_the_surface() {
        let mut grove = make_grove();
        let mut surface = Surface::acquire(80, 24).unwrap();
        let now = Instant::now();
        for _ in 0..40 {
            grove.step(now);
        }
        grove.render(&mut surface);

        let mut frame = crate::frame::Frame::new(80, 24, None);
        surface.blit(&mut frame, grove.palette(), false);
        let drawn = (0..24u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get(x, y).map(|c| c.ch != ' ').unwrap_or(false))
            .count();
        assert!(drawn > 0);
    }
}
