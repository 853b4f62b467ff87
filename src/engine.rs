// Copyright (c) 2026 oxyzenq

use std::time::Instant;

use crate::clock::FrameClock;
use crate::effect::Effect;
use crate::frame::Frame;
use crate::surface::Surface;

/// Binds one effect to one surface and one clock. A missing surface
/// aborts the mount: no clock starts, nothing is drawn, nothing errors.
/// The backdrop is decorative, its absence is not a failure worth
/// surfacing.
pub struct Engine {
    surface: Surface,
    effect: Box<dyn Effect>,
    clock: FrameClock,
    cols: u16,
    lines: u16,
}

impl Engine {
    pub fn mount(
        surface: Option<Surface>,
        effect: Box<dyn Effect>,
        cols: u16,
        lines: u16,
        now: Instant,
    ) -> Option<Self> {
        let surface = surface?;
        let clock = FrameClock::start(effect.tick(), now);
        Some(Self {
            surface,
            effect,
            clock,
            cols,
            lines,
        })
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    pub fn tick(&mut self, now: Instant) {
        self.effect.step(now);
        self.effect.render(&mut self.surface);
        self.clock.advance(now);
    }

    /// Advances the schedule without simulating, used while paused.
    pub fn skip(&mut self, now: Instant) {
        self.clock.advance(now);
    }

    pub fn blit(&self, frame: &mut Frame) {
        self.surface
            .blit(frame, self.effect.palette(), self.effect.bold_heads());
    }

    /// Rebuilds the surface at the new grid size, then lets the effect
    /// rebuild its sized state. Happens on the driver thread before the
    /// next tick, so the effect never observes a half-applied resize.
    pub fn resize(&mut self, cols: u16, lines: u16) {
        let Some(surface) = Surface::acquire(cols, lines) else {
            return;
        };
        self.cols = cols;
        self.lines = lines;
        self.surface = surface;
        self.effect
            .resize(self.surface.width(), self.surface.height());
    }

    /// Restarts the effect in place and drops accumulated trails.
    pub fn restart(&mut self, now: Instant) {
        if let Some(surface) = Surface::acquire(self.cols, self.lines) {
            self.surface = surface;
        }
        self.effect.restart(now);
    }

    pub fn defer(&mut self, by: std::time::Duration) {
        self.effect.defer(by);
        self.clock.defer(by);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::palette::{build_ramp, ColorMode, Palette};

    struct Counting {
        steps: usize,
        palette: Palette,
    }

    impl Counting {
        fn boxed() -> Box<Self> {
            Box::new(Self {
                steps: 0,
                palette: build_ramp(ColorMode::Mono, (0, 255, 65), None),
            })
        }
    }

    impl Effect for Counting {
        fn step(&mut self, _now: Instant) {
            self.steps += 1;
        }
        fn render(&self, _surface: &mut Surface) {}
        fn tick(&self) -> Duration {
            Duration::from_millis(35)
        }
        fn resize(&mut self, _width: f32, _height: f32) {}
        fn restart(&mut self, _now: Instant) {
            self.steps = 0;
        }
        fn palette(&self) -> &Palette {
            &self.palette
        }
    }

    #[test]
    fn unavailable_surface_mounts_nothing() {
        let engine = Engine::mount(None, Counting::boxed(), 80, 24, Instant::now());
        assert!(engine.is_none());
    }

    #[test]
    fn tick_steps_the_effect_and_advances_the_clock() {
        let now = Instant::now();
        let mut engine = Engine::mount(
            Surface::acquire(80, 24),
            Counting::boxed(),
            80,
            24,
            now,
        )
        .unwrap();

        assert!(engine.clock().due(now));
        engine.tick(now);
        assert!(!engine.clock().due(now));
        assert_eq!(engine.clock().deadline(), now + Duration::from_millis(35));
    }
}
