use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mission_core::{CoreSettings, DEFAULT_LOG_CAPACITY, DEFAULT_RECENT_JOBS_LIMIT};
use mission_engine::{
    local_clock, GatewaySettings, SessionConfig, DEFAULT_API_BASE, DEFAULT_REPORT_FILENAME,
};
use mission_logging::{mission_info, mission_warn};
use serde::{Deserialize, Serialize};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MISSION_MONITOR_CONFIG";
/// Overrides `api_base_url` from the config file.
pub const API_BASE_ENV: &str = "MISSION_MONITOR_API";

const DEFAULT_CONFIG_FILE: &str = "mission_monitor.ron";
const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub log_capacity: usize,
    pub recent_jobs_limit: usize,
    pub request_timeout_secs: Option<u64>,
    pub max_report_bytes: u64,
    pub report_dir: PathBuf,
    pub report_filename: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            poll_interval_ms: 3000,
            log_capacity: DEFAULT_LOG_CAPACITY,
            recent_jobs_limit: DEFAULT_RECENT_JOBS_LIMIT,
            request_timeout_secs: None,
            max_report_bytes: GatewaySettings::default().max_report_bytes,
            report_dir: PathBuf::from("."),
            report_filename: DEFAULT_REPORT_FILENAME.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Reads the config file named by the environment (or the default file),
    /// then applies the api override.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load_from(&path)?;
        if let Ok(url) = env::var(API_BASE_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                mission_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {path:?}"));
            }
        };
        let config: Self =
            ron::from_str(&content).with_context(|| format!("failed to parse config {path:?}"))?;
        mission_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_report_bytes: self.max_report_bytes,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        let mut poll_ms = self.poll_interval_ms;
        if poll_ms < MIN_POLL_INTERVAL_MS {
            mission_warn!(
                "poll_interval_ms {} is below {}; clamping",
                poll_ms,
                MIN_POLL_INTERVAL_MS
            );
            poll_ms = MIN_POLL_INTERVAL_MS;
        }
        SessionConfig {
            poll_interval: Duration::from_millis(poll_ms),
            report_dir: self.report_dir.clone(),
            report_filename: self.report_filename.clone(),
            clock: local_clock(),
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            log_capacity: self.log_capacity,
            recent_jobs_limit: self.recent_jobs_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = MonitorConfig::load_from(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.session_config().poll_interval, Duration::from_secs(3));
        assert_eq!(config.core_settings(), CoreSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("monitor.ron");
        fs::write(
            &path,
            r#"(api_base_url: "http://agent.local:8000/", recent_jobs_limit: 10, request_timeout_secs: Some(15))"#,
        )
        .unwrap();

        let config = MonitorConfig::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "http://agent.local:8000/");
        assert_eq!(config.recent_jobs_limit, 10);
        assert_eq!(config.log_capacity, 50);
        assert_eq!(
            config.gateway_settings().request_timeout,
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("monitor.ron");
        fs::write(&path, "(poll_interval_ms: \"soon\")").unwrap();
        assert!(MonitorConfig::load_from(&path).is_err());
    }

    #[test]
    fn tiny_poll_interval_is_clamped() {
        let config = MonitorConfig {
            poll_interval_ms: 0,
            ..MonitorConfig::default()
        };
        assert_eq!(
            config.session_config().poll_interval,
            Duration::from_millis(MIN_POLL_INTERVAL_MS)
        );
    }

    #[test]
    fn defaults_survive_a_ron_round_trip() {
        let text = ron::ser::to_string_pretty(
            &MonitorConfig::default(),
            ron::ser::PrettyConfig::new(),
        )
        .unwrap();
        let back: MonitorConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, MonitorConfig::default());
    }
}
