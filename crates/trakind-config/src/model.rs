// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::duration::parse_duration;

/// Polling interval used when `tracker.update_interval` is unusable.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Top-level trakind configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrakindConfig {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. Usually provided through `API_KEY`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Publish the command menu on startup.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            register_commands: true,
        }
    }
}

/// Subscription store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file. The parent directory is created on open.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Store identical subscriptions only once.
    #[serde(default = "default_true")]
    pub deduplicate_subscriptions: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
            deduplicate_subscriptions: true,
        }
    }
}

fn default_database_path() -> String {
    "./db/trakind.db".to_string()
}

fn default_true() -> bool {
    true
}

/// Slot polling settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Scheduling API root; desk paths are appended to it.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Poll period as a duration string (`1m`, `30s`, `1h30m`).
    #[serde(
        default = "default_update_interval",
        deserialize_with = "duration_string"
    )]
    pub update_interval: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Period of the subscriber count report.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,

    /// Largest party size polled for.
    #[serde(default = "default_max_people")]
    pub max_people: u8,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            update_interval: default_update_interval(),
            request_timeout_secs: default_request_timeout_secs(),
            report_interval_secs: default_report_interval_secs(),
            max_people: default_max_people(),
        }
    }
}

impl TrackerConfig {
    /// The parsed poll period, or one minute when unparseable or zero.
    pub fn effective_interval(&self) -> Duration {
        match parse_duration(&self.update_interval) {
            Ok(interval) if !interval.is_zero() => interval,
            Ok(_) => {
                tracing::warn!(
                    update_interval = %self.update_interval,
                    "zero update interval, using default"
                );
                DEFAULT_UPDATE_INTERVAL
            }
            Err(e) => {
                tracing::warn!(
                    update_interval = %self.update_interval,
                    error = %e,
                    "couldn't parse update interval, using default"
                );
                DEFAULT_UPDATE_INTERVAL
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }
}

fn default_api_base_url() -> String {
    "https://oap.ind.nl/oap/api".to_string()
}

fn default_update_interval() -> String {
    "1m".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_report_interval_secs() -> u64 {
    3600
}

fn default_max_people() -> u8 {
    6
}

/// Environment values such as `UPDATE_INTERVAL=60` arrive as typed scalars.
/// They are kept as text so the duration parser reports what is wrong and
/// [`TrackerConfig::effective_interval`] can fall back.
fn duration_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn tracker(interval: &str) -> TrackerConfig {
        TrackerConfig {
            update_interval: interval.to_string(),
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn effective_interval_uses_configured_value() {
        assert_eq!(tracker("30s").effective_interval(), Duration::from_secs(30));
        assert_eq!(tracker("1h30m").effective_interval(), Duration::from_secs(5400));
    }

    #[traced_test]
    #[test]
    fn effective_interval_falls_back_on_garbage() {
        assert_eq!(tracker("soon").effective_interval(), DEFAULT_UPDATE_INTERVAL);
        assert!(logs_contain("couldn't parse update interval"));
    }

    #[traced_test]
    #[test]
    fn effective_interval_falls_back_on_zero() {
        assert_eq!(tracker("0s").effective_interval(), DEFAULT_UPDATE_INTERVAL);
        assert!(logs_contain("zero update interval"));
    }

    #[test]
    fn numeric_interval_is_kept_as_text() {
        let config: TrakindConfig = toml::from_str("[tracker]\nupdate_interval = 60\n").unwrap();
        assert_eq!(config.tracker.update_interval, "60");
        assert_eq!(config.tracker.effective_interval(), DEFAULT_UPDATE_INTERVAL);
    }

    #[test]
    fn non_duration_scalars_fall_back() {
        for raw in ["1.5", "-5", "true"] {
            figment::Jail::expect_with(|jail| {
                jail.set_env("API_KEY", "x:y");
                jail.set_env("UPDATE_INTERVAL", raw);
                let config = crate::loader::load_config()?;
                assert_eq!(config.tracker.update_interval, raw);
                assert_eq!(config.tracker.effective_interval(), DEFAULT_UPDATE_INTERVAL);
                Ok(())
            });
        }
    }

    #[test]
    fn defaults_match_deployment() {
        let config = TrakindConfig::default();
        assert_eq!(config.agent.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.register_commands);
        assert_eq!(config.storage.database_path, "./db/trakind.db");
        assert!(config.storage.deduplicate_subscriptions);
        assert_eq!(config.tracker.api_base_url, "https://oap.ind.nl/oap/api");
        assert_eq!(config.tracker.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.tracker.report_interval(), Duration::from_secs(3600));
        assert_eq!(config.tracker.max_people, 6);
    }
}
