//! Spin lifecycle without timers: `Idle -> Spinning -> Revealing -> Idle`.
//!
//! Every transition takes the current instant from the caller, so the machine
//! can be stepped through time in tests without sleeping.

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::config::SpinConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Prize, SpinResult, WinRecord};

use super::celebration::Celebration;
use super::geometry::WheelGeometry;
use super::ticks::TickSchedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Revealing,
}

/// Returned when a spin starts; drives the rotation animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinStart {
    pub started_at: Instant,
    pub deadline: Instant,
    /// Accumulated rotation the wheel animates to.
    pub target_rotation: f64,
    /// Segment the wheel visually stops on. Cosmetic only.
    pub landing_segment: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinReveal {
    pub prize: Prize,
    pub spins_left: i64,
    pub record: WinRecord,
    /// Where the wheel stopped. Not derived from the prize, so the two
    /// generally differ.
    pub landing_segment: usize,
    pub celebration: Celebration,
}

/// Entry of the in-page win list (newest first).
#[derive(Debug, Clone, PartialEq)]
pub struct LocalWin {
    pub time: DateTime<Utc>,
    pub prize: Prize,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Spinning {
        start: SpinStart,
        outcome: Option<SpinResult>,
    },
    Revealing(SpinReveal),
}

#[derive(Debug, Clone)]
pub struct SpinMachine {
    config: SpinConfig,
    geometry: WheelGeometry,
    ticks: TickSchedule,
    phase: Phase,
    rotation: f64,
    history: Vec<LocalWin>,
}

impl SpinMachine {
    pub fn new(config: SpinConfig, segments: usize) -> Self {
        Self {
            config,
            geometry: WheelGeometry::new(segments),
            ticks: TickSchedule::from_config(&config),
            phase: Phase::Idle,
            rotation: 0.0,
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> SpinPhase {
        match self.phase {
            Phase::Idle => SpinPhase::Idle,
            Phase::Spinning { .. } => SpinPhase::Spinning,
            Phase::Revealing(_) => SpinPhase::Revealing,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.phase() == SpinPhase::Spinning
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn tick_schedule(&self) -> TickSchedule {
        self.ticks
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn history(&self) -> &[LocalWin] {
        &self.history
    }

    pub fn current_reveal(&self) -> Option<&SpinReveal> {
        match &self.phase {
            Phase::Revealing(reveal) => Some(reveal),
            _ => None,
        }
    }

    /// Begin a spin toward `segment` steps past the extra full turns.
    /// Returns `None` when a spin is already in progress.
    pub fn start(&mut self, now: Instant, segment: usize) -> Option<SpinStart> {
        if self.is_spinning() {
            return None;
        }

        let target_rotation =
            self.geometry
                .target_rotation(self.rotation, self.config.full_turns, segment);
        let start = SpinStart {
            started_at: now,
            deadline: now + self.config.duration(),
            target_rotation,
            landing_segment: self.geometry.landing_segment(target_rotation),
        };
        self.rotation = target_rotation;
        self.phase = Phase::Spinning {
            start,
            outcome: None,
        };
        Some(start)
    }

    /// Store the backend's answer; it is shown once the animation ends.
    pub fn resolve_ok(&mut self, result: SpinResult) -> AppResult<()> {
        match &mut self.phase {
            Phase::Spinning { outcome, .. } => {
                *outcome = Some(result);
                Ok(())
            }
            _ => Err(AppError::InternalError(
                "Spin result arrived while no spin was in progress".to_string(),
            )),
        }
    }

    /// The backend rejected the spin: back to idle, nothing is revealed.
    pub fn resolve_err(&mut self) {
        if self.is_spinning() {
            self.phase = Phase::Idle;
        }
    }

    /// Reveal once both the animation has finished and the result is known.
    pub fn reveal_due(&mut self, now: Instant) -> Option<SpinReveal> {
        let Phase::Spinning {
            start,
            outcome: Some(result),
        } = &self.phase
        else {
            return None;
        };
        if now < start.deadline {
            return None;
        }

        let celebration = Celebration::for_rarity(
            result.prize.rarity,
            std::time::Duration::from_millis(self.config.flourish_gap_ms),
        );
        let reveal = SpinReveal {
            prize: result.prize.clone(),
            spins_left: result.spins_left,
            record: result.record.clone(),
            landing_segment: start.landing_segment,
            celebration,
        };

        self.history.insert(
            0,
            LocalWin {
                time: Utc::now(),
                prize: reveal.prize.clone(),
            },
        );
        self.phase = Phase::Revealing(reveal.clone());
        Some(reveal)
    }

    /// Close the result view.
    pub fn dismiss(&mut self) {
        if let Phase::Revealing(_) = self.phase {
            self.phase = Phase::Idle;
        }
    }

    /// Drop whatever is in progress (teardown).
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}
