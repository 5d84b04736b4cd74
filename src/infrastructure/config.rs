use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub polling: PollingSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub interval_ms: u64,
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        // tokio intervals panic on a zero period
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub waypoint_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Defaults, then the optional file at `path`, then `UAM_*` environment
/// variables (`UAM_BACKEND__BASE_URL`, `UAM_POLLING__INTERVAL_MS`, ...).
pub fn load_config_from(path: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .set_default("backend.base_url", "http://localhost:8000/api")?
        .set_default("backend.timeout_ms", 10_000_i64)?
        .set_default("polling.interval_ms", 5_000_i64)?
        .set_default("cache.waypoint_capacity", 64_i64)?
        .set_default("server.listen_addr", "0.0.0.0:8080")?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("UAM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config_from("config/does-not-exist").unwrap();

        assert_eq!(config.backend.timeout(), Duration::from_secs(10));
        assert_eq!(config.polling.interval(), Duration::from_secs(5));
        assert_eq!(config.cache.waypoint_capacity, 64);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let polling = PollingSettings { interval_ms: 0 };
        assert_eq!(polling.interval(), Duration::from_millis(1));
    }
}
