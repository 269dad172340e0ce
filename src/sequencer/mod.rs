//! Spin sequencing: one spin from button press to revealed result.
//!
//! The rotation animation has a fixed length and starts at once; the backend
//! call runs alongside it. The result is revealed when the animation ends, or
//! later if the backend is slower than the animation. Ticks slow down along an
//! ease-out curve while the wheel turns.
//!
//! Timers run on tokio's clock, so tests pause it and step through a spin
//! deterministically.

pub mod celebration;
pub mod feedback;
pub mod geometry;
pub mod machine;
pub mod ticks;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, sleep_until};

use crate::config::SpinConfig;
use crate::error::{AppError, AppResult};
use crate::models::UserPatch;
use crate::services::{MockBackend, Session};

pub use celebration::*;
pub use feedback::*;
pub use geometry::WheelGeometry;
pub use machine::*;
pub use ticks::TickSchedule;

#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Revealed(SpinReveal),
    /// A spin was already running; nothing happened.
    Ignored,
    /// The sequencer was closed before the result could be shown.
    Cancelled,
}

struct Inner {
    machine: SpinMachine,
    tick_task: Option<JoinHandle<()>>,
    celebration_task: Option<JoinHandle<()>>,
    /// Bumped on every start and on close, so a stale spin can tell it lost.
    generation: u64,
    closed: bool,
}

impl Inner {
    fn stop_ticks(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
    }

    fn stop_celebration(&mut self) {
        if let Some(task) = self.celebration_task.take() {
            task.abort();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.closed && self.generation == generation
    }
}

pub struct SpinSequencer {
    backend: MockBackend,
    feedback: Arc<dyn SpinFeedback>,
    config: SpinConfig,
    inner: Mutex<Inner>,
}

impl SpinSequencer {
    pub fn new(
        backend: MockBackend,
        config: SpinConfig,
        segments: usize,
        feedback: Arc<dyn SpinFeedback>,
    ) -> Self {
        Self {
            backend,
            feedback,
            config,
            inner: Mutex::new(Inner {
                machine: SpinMachine::new(config, segments),
                tick_task: None,
                celebration_task: None,
                generation: 0,
                closed: false,
            }),
        }
    }

    pub async fn phase(&self) -> SpinPhase {
        self.inner.lock().await.machine.phase()
    }

    pub async fn is_spinning(&self) -> bool {
        self.inner.lock().await.machine.is_spinning()
    }

    pub async fn rotation(&self) -> f64 {
        self.inner.lock().await.machine.rotation()
    }

    /// Wins revealed in this view, newest first.
    pub async fn history(&self) -> Vec<LocalWin> {
        self.inner.lock().await.machine.history().to_vec()
    }

    pub async fn current_reveal(&self) -> Option<SpinReveal> {
        self.inner.lock().await.machine.current_reveal().cloned()
    }

    /// Close the result view.
    pub async fn dismiss_result(&self) {
        self.inner.lock().await.machine.dismiss();
    }

    /// Run one spin for the session's user.
    ///
    /// Calls made while a spin is running return [`SpinOutcome::Ignored`].
    /// Backend failures end the spin at once, are passed to
    /// [`SpinFeedback::spin_failed`] and returned as errors.
    pub async fn spin(&self, session: &Session) -> AppResult<SpinOutcome> {
        if self.is_spinning().await {
            return Ok(SpinOutcome::Ignored);
        }
        let Some(user) = session.current_user().await else {
            let err = AppError::AuthError("Login to play".to_string());
            self.feedback.spin_failed(&err.user_message());
            return Err(err);
        };

        let (start, generation) = {
            let mut inner = self.inner.lock().await;
            if inner.closed {
                return Ok(SpinOutcome::Cancelled);
            }
            let segment = inner.machine.geometry().random_segment();
            let Some(start) = inner.machine.start(Instant::now(), segment) else {
                return Ok(SpinOutcome::Ignored);
            };
            inner.generation += 1;

            inner.stop_celebration();
            self.feedback.glow(false);
            self.feedback.rotate_to(start.target_rotation, self.config.duration());
            inner.tick_task = Some(self.spawn_ticks(inner.machine.tick_schedule(), start.started_at));

            (start, inner.generation)
        };
        log::debug!(
            "Spin #{generation} started for user {}, wheel target {:.0}°",
            user.id,
            start.target_rotation
        );

        let result = self.backend.perform_spin(user.id).await;

        match result {
            Err(err) => {
                let mut inner = self.inner.lock().await;
                if !inner.is_current(generation) {
                    return Ok(SpinOutcome::Cancelled);
                }
                inner.stop_ticks();
                inner.machine.resolve_err();
                drop(inner);

                log::warn!("Spin for user {} rejected: {err}", user.id);
                self.feedback.spin_failed(&err.user_message());
                Err(err)
            }
            Ok(spin) => {
                {
                    let mut inner = self.inner.lock().await;
                    if !inner.is_current(generation) {
                        return Ok(SpinOutcome::Cancelled);
                    }
                    inner.machine.resolve_ok(spin.clone())?;
                }
                session.set_user(UserPatch::spins(spin.spins_left)).await;

                // 动画结束后才公布结果
                sleep_until(start.deadline).await;
                self.reveal(generation).await
            }
        }
    }

    async fn reveal(&self, generation: u64) -> AppResult<SpinOutcome> {
        let mut inner = self.inner.lock().await;
        if !inner.is_current(generation) {
            return Ok(SpinOutcome::Cancelled);
        }
        inner.stop_ticks();

        let reveal = inner.machine.reveal_due(Instant::now()).ok_or_else(|| {
            AppError::InternalError("Spin result not ready at reveal time".to_string())
        })?;

        self.feedback.reveal(&reveal);
        self.feedback.glow(reveal.celebration.glow);
        inner.celebration_task = Some(self.spawn_celebration(reveal.celebration.clone()));

        log::info!(
            "Revealed {} ({}) after spin #{generation}",
            reveal.prize.id,
            reveal.prize.rarity
        );
        Ok(SpinOutcome::Revealed(reveal))
    }

    fn spawn_ticks(&self, schedule: TickSchedule, started_at: Instant) -> JoinHandle<()> {
        let feedback = Arc::clone(&self.feedback);
        tokio::spawn(async move {
            loop {
                feedback.tick();
                match schedule.next_delay(started_at.elapsed()) {
                    Some(delay) => sleep(delay).await,
                    None => break,
                }
            }
        })
    }

    fn spawn_celebration(&self, celebration: Celebration) -> JoinHandle<()> {
        let feedback = Arc::clone(&self.feedback);
        let revealed_at = Instant::now();
        tokio::spawn(async move {
            for step in celebration.steps {
                sleep_until(revealed_at + step.at).await;
                match &step.action {
                    CelebrationAction::Burst(burst) => feedback.confetti_burst(burst),
                    CelebrationAction::Stream(stream) => feedback.confetti_stream(stream),
                    CelebrationAction::Tick => feedback.tick(),
                }
            }
        })
    }

    /// Tear down: stop every timer and free audio. A spin still waiting on the
    /// backend finishes as [`SpinOutcome::Cancelled`] and its result is dropped.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.generation += 1;
        inner.stop_ticks();
        inner.stop_celebration();
        inner.machine.cancel();
        self.feedback.release();
        log::debug!("Spin sequencer closed");
    }
}

impl Drop for SpinSequencer {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        inner.stop_ticks();
        inner.stop_celebration();
        if !inner.closed {
            inner.closed = true;
            self.feedback.release();
        }
    }
}
