// Copyright (c) 2026 oxyzenq

use std::time::{Duration, Instant};

use crate::palette::Palette;
use crate::surface::Surface;

/// One simulation step plus a paint of the resulting state. `step` owns
/// all mutation; `render` only reads, so it can be driven by any clock.
pub trait Effect {
    /// Advances the simulation by one tick. `now` only matters to
    /// effects with deferred work (the grove's settle deadline).
    fn step(&mut self, now: Instant);

    fn render(&self, surface: &mut Surface);

    /// Fixed tick interval this effect wants from the frame clock.
    fn tick(&self) -> Duration;

    /// Viewport change: rebuild whatever state is sized to the canvas.
    fn resize(&mut self, width: f32, height: f32);

    /// Full restart of the effect's state, keeping its tuning.
    fn restart(&mut self, now: Instant);

    /// Shifts any pending deadline, used when resuming from pause.
    fn defer(&mut self, _by: Duration) {}

    fn palette(&self) -> &Palette;

    /// Whether the hottest intensity levels should render bold.
    fn bold_heads(&self) -> bool {
        false
    }
}
