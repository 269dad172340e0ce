use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::celebration::{ConfettiBurst, ConfettiStream};
use super::machine::SpinReveal;

/// Audio and visual side of a spin. Implemented by whatever renders the wheel.
///
/// Calls arrive from the sequencer's timer tasks, so implementations must be
/// cheap and must not block.
pub trait SpinFeedback: Send + Sync + 'static {
    /// Start the rotation animation toward `degrees` (absolute, accumulated).
    fn rotate_to(&self, degrees: f64, duration: Duration);

    fn tick(&self);

    fn confetti_burst(&self, burst: &ConfettiBurst);

    fn confetti_stream(&self, stream: &ConfettiStream);

    fn glow(&self, on: bool);

    fn reveal(&self, reveal: &SpinReveal);

    /// A spin was rejected; `message` is meant for the player.
    fn spin_failed(&self, message: &str);

    /// Free the audio device. Called once on teardown.
    fn release(&self);
}

/// Writes every cue to the log. Used by the demo binary and headless runs.
#[derive(Debug, Default)]
pub struct LogFeedback {
    ticks: AtomicUsize,
    audio_open: AtomicBool,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl SpinFeedback for LogFeedback {
    fn rotate_to(&self, degrees: f64, duration: Duration) {
        log::info!("Wheel rotating to {degrees:.0}° over {}ms", duration.as_millis());
    }

    fn tick(&self) {
        // 首次发声时打开音频
        if !self.audio_open.swap(true, Ordering::SeqCst) {
            log::debug!("Audio opened");
        }
        let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("tick #{n}");
    }

    fn confetti_burst(&self, burst: &ConfettiBurst) {
        log::info!(
            "Confetti burst: {} particles, spread {}°",
            burst.particle_count,
            burst.spread
        );
    }

    fn confetti_stream(&self, stream: &ConfettiStream) {
        log::info!(
            "Confetti stream: {} particles/frame for {}ms",
            stream.particles_per_frame,
            stream.duration.as_millis()
        );
    }

    fn glow(&self, on: bool) {
        log::debug!("Glow {}", if on { "on" } else { "off" });
    }

    fn reveal(&self, reveal: &SpinReveal) {
        log::info!(
            "You won ({}) {}: {} [{} spins left]",
            reveal.prize.id,
            reveal.prize.full_name,
            reveal.prize.result_message(),
            reveal.spins_left
        );
    }

    fn spin_failed(&self, message: &str) {
        log::warn!("Spin failed: {message}");
    }

    fn release(&self) {
        if self.audio_open.swap(false, Ordering::SeqCst) {
            log::debug!("Audio released after {} ticks", self.ticks());
        }
    }
}
