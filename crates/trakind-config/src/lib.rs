// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for trakind.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use trakind_config::load_and_validate_for_serve;
//!
//! let config = load_and_validate_for_serve().expect("config errors");
//! println!("polling every {:?}", config.tracker.effective_interval());
//! ```

pub mod diagnostic;
pub mod duration;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TrakindConfig;

type Validator = fn(&TrakindConfig) -> Result<(), Vec<ConfigError>>;

/// Load configuration from the XDG hierarchy and validate it.
///
/// The bot token is not required; use this for commands that only touch
/// the local store.
pub fn load_and_validate() -> Result<TrakindConfig, Vec<ConfigError>> {
    load_with(validation::validate_config)
}

/// Like [`load_and_validate`], additionally requiring the bot token.
pub fn load_and_validate_for_serve() -> Result<TrakindConfig, Vec<ConfigError>> {
    load_with(validation::validate_serve)
}

/// Load configuration from a TOML string and validate it for serving.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<TrakindConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_serve(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

fn load_with(validate: Validator) -> Result<TrakindConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validate(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = std::path::Path::new(loader::SYSTEM_CONFIG);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}
