// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the trakind configuration system.

use std::time::Duration;

use trakind_config::diagnostic::ConfigError;
use trakind_config::model::TrakindConfig;
use trakind_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[agent]
log_level = "debug"

[telegram]
bot_token = "123:ABC"
register_commands = false

[storage]
database_path = "/tmp/trakind-test.db"
wal_mode = false
deduplicate_subscriptions = false

[tracker]
api_base_url = "http://localhost:9000/oap/api"
update_interval = "2m30s"
request_timeout_secs = 5
report_interval_secs = 600
max_people = 4
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert!(!config.telegram.register_commands);
    assert_eq!(config.storage.database_path, "/tmp/trakind-test.db");
    assert!(!config.storage.wal_mode);
    assert!(!config.storage.deduplicate_subscriptions);
    assert_eq!(config.tracker.api_base_url, "http://localhost:9000/oap/api");
    assert_eq!(config.tracker.effective_interval(), Duration::from_secs(150));
    assert_eq!(config.tracker.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.tracker.report_interval(), Duration::from_secs(600));
    assert_eq!(config.tracker.max_people, 4);
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[telegram]\nbot_token = \"t\"\n").unwrap();
    let defaults = TrakindConfig::default();
    assert_eq!(config.storage.database_path, defaults.storage.database_path);
    assert_eq!(config.tracker.update_interval, "1m");
    assert_eq!(config.agent.log_level, "info");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let err = load_config_from_str("[anthropic]\napi_key = \"x\"\n").unwrap_err();
    assert!(err.to_string().contains("anthropic"), "got: {err}");
}

#[test]
fn typo_in_tracker_gets_a_suggestion_and_span() {
    let errors = load_and_validate_str("[tracker]\nupdate_intervl = \"1m\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            span,
            ..
        } => {
            assert_eq!(key, "update_intervl");
            assert_eq!(suggestion.as_deref(), Some("update_interval"));
            assert!(valid_keys.contains("max_people"));
            assert!(span.is_some());
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported_with_key_path() {
    let errors = load_and_validate_str("[tracker]\nmax_people = \"many\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "tracker.max_people")),
        "got: {errors:?}"
    );
}

#[test]
fn serve_validation_demands_token() {
    let errors = load_and_validate_str("").unwrap_err();
    assert!(errors.iter().any(|e| matches!(e, ConfigError::MissingBotToken)));

    let config = load_and_validate_str("[telegram]\nbot_token = \"123:ABC\"\n").unwrap();
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
}

#[test]
fn diagnostics_render_through_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let errors = load_and_validate_str("").unwrap_err();
    let diagnostic: &dyn Diagnostic = &errors[0];
    let code = diagnostic.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("trakind::config::missing_bot_token"));

    let mut out = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut out, diagnostic)
        .unwrap();
    assert!(out.contains("API_KEY"));
}

#[test]
fn explicit_path_is_layered_under_env() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            "[storage]\ndatabase_path = \"from-file.db\"\n[tracker]\nupdate_interval = \"5m\"\n",
        )?;
        jail.set_env("UPDATE_INTERVAL", "45s");
        let config = load_config_from_path(std::path::Path::new("custom.toml"))?;
        assert_eq!(config.storage.database_path, "from-file.db");
        assert_eq!(config.tracker.effective_interval(), Duration::from_secs(45));
        Ok(())
    });
}

#[test]
fn missing_file_is_silently_skipped() {
    figment::Jail::expect_with(|_jail| {
        let config = load_config_from_path(std::path::Path::new("does-not-exist.toml"))?;
        assert_eq!(config.tracker.max_people, 6);
        Ok(())
    });
}
