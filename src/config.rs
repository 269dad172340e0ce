use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub spin: SpinConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 模拟网络延迟（毫秒，闭区间）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatencyConfig {
    pub read_min_ms: u64,
    pub read_max_ms: u64,
    pub spin_min_ms: u64,
    pub spin_max_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            read_min_ms: 80,
            read_max_ms: 320,
            spin_min_ms: 300,
            spin_max_ms: 900,
        }
    }
}

impl LatencyConfig {
    /// 无延迟（测试或本地调试用）
    pub fn none() -> Self {
        Self {
            read_min_ms: 0,
            read_max_ms: 0,
            spin_min_ms: 0,
            spin_max_ms: 0,
        }
    }
}

/// 转盘动画与音效节奏配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinConfig {
    pub duration_ms: u64,
    pub base_tick_ms: u64,
    pub max_tick_ms: u64,
    pub full_turns: u32,
    pub flourish_gap_ms: u64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            duration_ms: 4000,
            base_tick_ms: 40,
            max_tick_ms: 260,
            full_turns: 5,
            flourish_gap_ms: 120,
        }
    }
}

impl SpinConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedConfig {
    /// 首次登录创建用户时赠送的次数
    pub default_spins: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { default_spins: 5 }
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 没有配置文件时完全依赖环境变量与默认值
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No config file at {config_path}, using defaults and environment");
                Config::default()
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Failed to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {e}")))
    }

    // 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|v| v.parse::<T>().ok())
        }

        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = get_env_parse("SERVER_PORT") {
            self.server.port = p;
        }
        if let Some(n) = get_env_parse("LATENCY_READ_MIN_MS") {
            self.latency.read_min_ms = n;
        }
        if let Some(n) = get_env_parse("LATENCY_READ_MAX_MS") {
            self.latency.read_max_ms = n;
        }
        if let Some(n) = get_env_parse("LATENCY_SPIN_MIN_MS") {
            self.latency.spin_min_ms = n;
        }
        if let Some(n) = get_env_parse("LATENCY_SPIN_MAX_MS") {
            self.latency.spin_max_ms = n;
        }
        if let Some(n) = get_env_parse("SPIN_DURATION_MS") {
            self.spin.duration_ms = n;
        }
        if let Some(n) = get_env_parse("DEFAULT_SPINS") {
            self.seed.default_spins = n;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.latency.read_min_ms > self.latency.read_max_ms {
            return Err(AppError::ConfigError(
                "latency.read_min_ms must not exceed latency.read_max_ms".into(),
            ));
        }
        if self.latency.spin_min_ms > self.latency.spin_max_ms {
            return Err(AppError::ConfigError(
                "latency.spin_min_ms must not exceed latency.spin_max_ms".into(),
            ));
        }
        if self.spin.duration_ms == 0 {
            return Err(AppError::ConfigError("spin.duration_ms must be positive".into()));
        }
        if self.spin.base_tick_ms == 0 || self.spin.base_tick_ms > self.spin.max_tick_ms {
            return Err(AppError::ConfigError(
                "spin.base_tick_ms must be positive and not exceed spin.max_tick_ms".into(),
            ));
        }
        if self.seed.default_spins < 0 {
            return Err(AppError::ConfigError("seed.default_spins must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [spin]
            duration_ms = 2500
            base_tick_ms = 40
            max_tick_ms = 260
            full_turns = 3
            flourish_gap_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.spin.duration_ms, 2500);
        assert_eq!(config.latency, LatencyConfig::default());
        assert_eq!(config.seed.default_spins, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_latency() {
        let mut config = Config::default();
        config.latency.spin_min_ms = 1000;
        config.latency.spin_max_ms = 10;
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_tick_bounds() {
        let mut config = Config::default();
        config.spin.base_tick_ms = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        assert!(matches!(Config::parse("server = 3"), Err(AppError::ConfigError(_))));
    }
}
