// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.
//! All errors are collected; validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::TrakindConfig;

/// Party sizes the scheduling API accepts.
const PARTY_SIZE_LIMIT: u8 = 6;

/// Validate everything except the presence of a bot token.
pub fn validate_config(config: &TrakindConfig) -> Result<(), Vec<ConfigError>> {
    let errors = collect(config);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate for running the bot: [`validate_config`] plus a non-empty token.
pub fn validate_serve(config: &TrakindConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let has_token = config
        .telegram
        .bot_token
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());
    if !has_token {
        errors.push(ConfigError::MissingBotToken);
    }

    errors.extend(collect(config));
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn collect(config: &TrakindConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation("storage.database_path must not be empty"));
    }

    let base = config.tracker.api_base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        errors.push(validation(format!(
            "tracker.api_base_url `{base}` must start with http:// or https://"
        )));
    }

    if config.tracker.request_timeout_secs == 0 {
        errors.push(validation("tracker.request_timeout_secs must be at least 1"));
    }

    if config.tracker.report_interval_secs == 0 {
        errors.push(validation("tracker.report_interval_secs must be at least 1"));
    }

    if !(1..=PARTY_SIZE_LIMIT).contains(&config.tracker.max_people) {
        errors.push(validation(format!(
            "tracker.max_people must be between 1 and {PARTY_SIZE_LIMIT}, got {}",
            config.tracker.max_people
        )));
    }

    if config.agent.log_level.parse::<tracing::Level>().is_err() {
        errors.push(validation(format!(
            "agent.log_level `{}` is not one of trace, debug, info, warn, error",
            config.agent.log_level
        )));
    }

    errors
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
