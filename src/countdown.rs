use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Radius of the circular progress stroke.
pub const RING_RADIUS: f32 = 35.0;

/// Per-second countdown shown while an ad plays.
///
/// Ticks are deadlines compared against the caller's `now`. Once the
/// remaining count reaches zero the countdown disarms itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    total: u32,
    remaining: u32,
    next_tick: Instant,
    armed: bool,
}

impl Countdown {
    /// Start a countdown covering `duration`, rounded up to whole seconds.
    pub fn start(duration: Duration, now: Instant) -> Self {
        let total = duration.as_millis().div_ceil(1000) as u32;
        Self {
            total,
            remaining: total,
            next_tick: now + TICK,
            armed: total > 0,
        }
    }

    /// Apply every tick due at `now`. Returns true when the display changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while self.armed && now >= self.next_tick {
            self.remaining = self.remaining.saturating_sub(1);
            self.next_tick += TICK;
            changed = true;
            if self.remaining == 0 {
                self.armed = false;
            }
        }
        changed
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Elapsed share of the countdown in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.remaining) as f32 / self.total as f32
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.then_some(self.next_tick)
    }
}
