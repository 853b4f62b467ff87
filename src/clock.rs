// Copyright (c) 2026 oxyzenq

use std::time::{Duration, Instant};

/// Fixed-interval pacing for the driver loop. The loop sleeps (via event
/// poll timeout) until `deadline`, runs one tick, then advances. Changing
/// the period goes through `restart`.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn start(period: Duration, now: Instant) -> Self {
        Self { period, next: now }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    pub fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Schedules the next tick. If the work ran long, the schedule snaps
    /// to `now` instead of accumulating a backlog of missed ticks.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.period;
        if now > self.next {
            self.next = now;
        }
    }

    pub fn restart(&mut self, period: Duration, now: Instant) {
        self.period = period;
        self.next = now;
    }

    /// Shifts the deadline forward, used when resuming from pause.
    pub fn defer(&mut self, by: Duration) {
        self.next += by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_at_fixed_period() {
        let t0 = Instant::now();
        let mut clock = FrameClock::start(Duration::from_millis(35), t0);
        assert!(clock.due(t0));

        clock.advance(t0);
        assert!(!clock.due(t0 + Duration::from_millis(34)));
        assert!(clock.due(t0 + Duration::from_millis(35)));
    }

    #[test]
    fn advance_snaps_forward_after_a_long_tick() {
        let t0 = Instant::now();
        let mut clock = FrameClock::start(Duration::from_millis(35), t0);
        let late = t0 + Duration::from_millis(500);
        clock.advance(late);
        assert_eq!(clock.deadline(), late);
    }

    #[test]
    fn restart_applies_a_new_period() {
        let t0 = Instant::now();
        let mut clock = FrameClock::start(Duration::from_millis(35), t0);
        clock.restart(Duration::from_millis(28), t0);
        assert_eq!(clock.period(), Duration::from_millis(28));
        clock.advance(t0);
        assert_eq!(clock.deadline(), t0 + Duration::from_millis(28));
    }
}
