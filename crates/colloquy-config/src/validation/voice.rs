//! Voice input validation.

use crate::schema::ColloquyConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(super) fn validate_voice(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let v = &config.voice;
    validate_range(errors, "voice.listen_timeout_secs", v.listen_timeout_secs, 1, 60);
    validate_range(
        errors,
        "voice.phrase_time_limit_secs",
        v.phrase_time_limit_secs,
        1,
        120,
    );
    validate_not_blank(errors, "voice.language", v.language.as_deref());

    if v.enabled {
        if v.recorder_command.is_empty() || v.recorder_command[0].trim().is_empty() {
            errors.push("voice.recorder_command must name a program when voice is enabled".into());
        }
        if v.model.trim().is_empty() {
            errors.push("voice.model must not be empty when voice is enabled".into());
        }
    }
}
