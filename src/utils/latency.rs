use rand::Rng;
use std::time::Duration;

use crate::config::LatencyConfig;

/// 延迟类别：普通读写 / 抽奖
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyKind {
    Read,
    Spin,
}

/// 在 [min, max] 毫秒内随机取一个延迟
pub fn random_delay(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    let mut rng = rand::rng();
    Duration::from_millis(rng.random_range(min_ms..=max_ms))
}

impl LatencyConfig {
    pub fn sample(&self, kind: LatencyKind) -> Duration {
        match kind {
            LatencyKind::Read => random_delay(self.read_min_ms, self.read_max_ms),
            LatencyKind::Spin => random_delay(self.spin_min_ms, self.spin_max_ms),
        }
    }
}

/// 模拟一次网络往返
pub async fn simulate(latency: &LatencyConfig, kind: LatencyKind) {
    let delay = latency.sample(kind);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_within_bounds() {
        for _ in 0..200 {
            let d = random_delay(80, 320);
            assert!(d >= Duration::from_millis(80) && d <= Duration::from_millis(320));
        }
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(random_delay(50, 50), Duration::from_millis(50));
        assert_eq!(random_delay(0, 0), Duration::ZERO);
    }

    #[test]
    fn test_sample_uses_kind_range() {
        let latency = LatencyConfig::default();
        for _ in 0..100 {
            let d = latency.sample(LatencyKind::Spin);
            assert!(d >= Duration::from_millis(300) && d <= Duration::from_millis(900));
        }
    }
}
