// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/trakind/trakind.toml`
//! 3. `~/.config/trakind/trakind.toml`
//! 4. `./trakind.toml`
//! 5. `TRAKIND_*` environment variables
//! 6. The bare `API_KEY` and `UPDATE_INTERVAL` variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TrakindConfig;

pub const SYSTEM_CONFIG: &str = "/etc/trakind/trakind.toml";
pub const LOCAL_CONFIG: &str = "trakind.toml";

/// Sections addressable through `TRAKIND_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &["agent", "telegram", "storage", "tracker"];

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trakind").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<TrakindConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<TrakindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrakindConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TrakindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrakindConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(bare_env_provider())
        .extract()
}

/// The full provider stack, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TrakindConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
        .merge(bare_env_provider())
}

/// `TRAKIND_<SECTION>_<KEY>` with an explicit section split.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `TRAKIND_TELEGRAM_BOT_TOKEN` maps to `telegram.bot_token`.
fn env_provider() -> Env {
    Env::prefixed("TRAKIND_").map(|key| {
        let key_str = key.as_str();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}

/// The two unprefixed variables the bot has always been deployed with.
fn bare_env_provider() -> Env {
    Env::raw()
        .only(&["API_KEY", "UPDATE_INTERVAL"])
        .map(|key| {
            if key.as_str().eq_ignore_ascii_case("api_key") {
                "telegram.bot_token".into()
            } else if key.as_str().eq_ignore_ascii_case("update_interval") {
                "tracker.update_interval".into()
            } else {
                key.as_str().to_string().into()
            }
        })
}
