//! Feedback played when a result is revealed. Rarest prizes get the loud version.

use std::time::Duration;

use crate::models::Rarity;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiBurst {
    pub particle_count: u32,
    pub spread: u32,
    pub start_velocity: u32,
    pub scalar: f32,
    /// Vertical origin, 0.0 = top of the viewport.
    pub origin_y: f32,
}

/// Small bursts fired every frame for `duration`, from random origins.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiStream {
    pub particles_per_frame: u32,
    pub spread: u32,
    pub start_velocity: u32,
    pub lifetime_ticks: u32,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CelebrationAction {
    Burst(ConfettiBurst),
    Stream(ConfettiStream),
    Tick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelebrationStep {
    /// Offset from the reveal.
    pub at: Duration,
    pub action: CelebrationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationKind {
    Jackpot,
    Standard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub kind: CelebrationKind,
    /// Sustained highlight on the winning segment until the next spin.
    pub glow: bool,
    /// Ordered by `at`.
    pub steps: Vec<CelebrationStep>,
}

impl Celebration {
    pub fn for_rarity(rarity: Rarity, flourish_gap: Duration) -> Self {
        if rarity.is_rarest() {
            Self::jackpot(flourish_gap)
        } else {
            Self::standard()
        }
    }

    pub fn jackpot(flourish_gap: Duration) -> Self {
        let mut steps = vec![
            CelebrationStep {
                at: Duration::ZERO,
                action: CelebrationAction::Burst(ConfettiBurst {
                    particle_count: 220,
                    spread: 160,
                    start_velocity: 60,
                    scalar: 1.2,
                    origin_y: 0.35,
                }),
            },
            CelebrationStep {
                at: Duration::from_millis(200),
                action: CelebrationAction::Burst(ConfettiBurst {
                    particle_count: 120,
                    spread: 200,
                    start_velocity: 30,
                    scalar: 1.0,
                    origin_y: 0.3,
                }),
            },
        ];
        // triple-tick flourish
        steps.extend((0..3u32).map(|i| CelebrationStep {
            at: flourish_gap * i,
            action: CelebrationAction::Tick,
        }));
        steps.sort_by_key(|s| s.at);

        Self {
            kind: CelebrationKind::Jackpot,
            glow: true,
            steps,
        }
    }

    pub fn standard() -> Self {
        Self {
            kind: CelebrationKind::Standard,
            glow: false,
            steps: vec![CelebrationStep {
                at: Duration::ZERO,
                action: CelebrationAction::Stream(ConfettiStream {
                    particles_per_frame: 8,
                    spread: 120,
                    start_velocity: 22,
                    lifetime_ticks: 60,
                    duration: Duration::from_millis(500),
                }),
            }],
        }
    }

    pub fn flourish_ticks(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.action == CelebrationAction::Tick)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legendary_gets_jackpot() {
        let c = Celebration::for_rarity(Rarity::Legendary, Duration::from_millis(120));
        assert_eq!(c.kind, CelebrationKind::Jackpot);
        assert!(c.glow);
        assert_eq!(c.flourish_ticks(), 3);

        let tick_offsets: Vec<_> = c
            .steps
            .iter()
            .filter(|s| s.action == CelebrationAction::Tick)
            .map(|s| s.at.as_millis())
            .collect();
        assert_eq!(tick_offsets, vec![0, 120, 240]);
        assert!(c.steps.windows(2).all(|w| w[0].at <= w[1].at));
    }

    #[test]
    fn test_other_tiers_get_standard() {
        for rarity in [Rarity::Common, Rarity::Uncommon] {
            let c = Celebration::for_rarity(rarity, Duration::from_millis(120));
            assert_eq!(c.kind, CelebrationKind::Standard);
            assert!(!c.glow);
            assert_eq!(c.flourish_ticks(), 0);
        }
    }
}
