//! Provider and session validation.

use crate::schema::{ColloquyConfig, HistoryConfig, LOG_LEVELS};

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

pub(super) fn validate_provider(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let p = &config.provider;
    validate_range_f64(errors, "provider.temperature", p.temperature, 0.0, 2.0);
    validate_range_f64(errors, "provider.top_p", p.top_p, 0.0, 1.0);
    validate_range(errors, "provider.max_tokens", p.max_tokens, 1, 32768);
    validate_range(
        errors,
        "provider.request_timeout_secs",
        p.request_timeout_secs,
        1,
        600,
    );
    validate_not_blank(errors, "provider.base_url", p.base_url.as_deref());

    if let Some(url) = p.base_url.as_deref() {
        if !url.trim().is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(format!("provider.base_url = {url} must start with http:// or https://"));
        }
    }
}

pub(super) fn validate_session(errors: &mut Vec<String>, config: &ColloquyConfig) {
    if config.session.history == HistoryConfig::LastTurns(0) {
        errors.push("session.history.last_turns must be at least 1".into());
    }
}

pub(super) fn validate_logging(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {} must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
}
