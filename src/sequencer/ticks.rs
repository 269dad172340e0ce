//! Audible tick cadence while the wheel decelerates.

use std::time::Duration;

use crate::config::SpinConfig;

/// Cubic ease-out: fast start, slow finish.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Gap between ticks grows from `base` to `max` along an ease-out curve over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    duration: Duration,
    base: Duration,
    max: Duration,
}

impl TickSchedule {
    pub fn new(duration: Duration, base: Duration, max: Duration) -> Self {
        Self {
            duration,
            base,
            max: max.max(base),
        }
    }

    pub fn from_config(config: &SpinConfig) -> Self {
        Self::new(
            config.duration(),
            Duration::from_millis(config.base_tick_ms),
            Duration::from_millis(config.max_tick_ms),
        )
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Gap to the next tick for a tick fired at `elapsed`.
    pub fn delay_at(&self, elapsed: Duration) -> Duration {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.base + (self.max - self.base).mul_f64(ease_out_cubic(t))
    }

    /// Delay before the next tick, or `None` once the next tick would land at or
    /// past the end of the animation.
    pub fn next_delay(&self, elapsed: Duration) -> Option<Duration> {
        if elapsed >= self.duration {
            return None;
        }
        let delay = self.delay_at(elapsed);
        (elapsed + delay < self.duration).then_some(delay)
    }

    /// Tick offsets with ideal timers, starting with an immediate tick.
    pub fn offsets(&self) -> TickOffsets {
        TickOffsets {
            schedule: *self,
            next: Some(Duration::ZERO),
        }
    }
}

pub struct TickOffsets {
    schedule: TickSchedule,
    next: Option<Duration>,
}

impl Iterator for TickOffsets {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next?;
        self.next = self
            .schedule
            .next_delay(current)
            .map(|delay| current + delay);
        Some(current)
    }
}
