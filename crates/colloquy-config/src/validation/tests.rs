//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = ColloquyConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = ColloquyConfig::default();
    config.provider.temperature = 2.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.temperature"));
}

#[test]
fn catches_nan_top_p() {
    let mut config = ColloquyConfig::default();
    config.provider.top_p = f64::NAN;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.top_p"));
}

#[test]
fn catches_zero_max_tokens() {
    let mut config = ColloquyConfig::default();
    config.provider.max_tokens = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.max_tokens"));
}

#[test]
fn catches_base_url_without_scheme() {
    let mut config = ColloquyConfig::default();
    config.provider.base_url = Some("api.groq.com".into());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.base_url"));
}

#[test]
fn catches_zero_last_turns() {
    let mut config = ColloquyConfig::default();
    config.session.history = HistoryConfig::LastTurns(0);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("last_turns"));
}

#[test]
fn catches_unknown_log_level() {
    let mut config = ColloquyConfig::default();
    config.logging.level = "loud".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("logging.level"));
}

#[test]
fn log_level_is_case_insensitive() {
    let mut config = ColloquyConfig::default();
    config.logging.level = "DEBUG".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_listen_timeout() {
    let mut config = ColloquyConfig::default();
    config.voice.listen_timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("voice.listen_timeout_secs"));
}

#[test]
fn empty_recorder_only_matters_when_enabled() {
    let mut config = ColloquyConfig::default();
    config.voice.recorder_command.clear();
    assert!(validate(&config).is_err());

    config.voice.enabled = false;
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_multiple_errors() {
    let mut config = ColloquyConfig::default();
    config.provider.top_p = 1.5;
    config.voice.phrase_time_limit_secs = 500;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.top_p"));
    assert!(err.contains("voice.phrase_time_limit_secs"));
    assert!(err.contains("; "));
}
