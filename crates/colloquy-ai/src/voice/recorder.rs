//! Live capture through an external recorder program.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use colloquy_config::schema::{VoiceConfig, PHRASE_LIMIT_PLACEHOLDER};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use super::{AudioSource, CaptureError, CapturedAudio, ListenLimits};

/// Runs a recorder that writes one WAV utterance to stdout and exits.
///
/// The default is `sox -d` with silence detection: it waits for speech,
/// stops after a pause and never runs past the phrase limit. The whole
/// capture is also bounded by `listen_timeout + phrase_time_limit`; if the
/// recorder is still running then, nobody spoke and it is killed.
///
/// `listen_timeout` is not enforced on its own: speech that starts after it
/// is still recorded as long as the recording ends within the combined
/// budget. Only the recorder program can tell when speech begins.
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    program: String,
    args: Vec<String>,
}

impl CommandRecorder {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &VoiceConfig) -> Result<Self, CaptureError> {
        let (program, args) = config
            .recorder_command
            .split_first()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no recorder command configured".into()))?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn expanded_args(&self, limits: &ListenLimits) -> Vec<String> {
        let phrase = limits.phrase_time_limit.as_secs().to_string();
        self.args
            .iter()
            .map(|a| a.replace(PHRASE_LIMIT_PLACEHOLDER, &phrase))
            .collect()
    }
}

#[async_trait]
impl AudioSource for CommandRecorder {
    async fn capture(&self, limits: &ListenLimits) -> Result<CapturedAudio, CaptureError> {
        let args = self.expanded_args(limits);
        debug!(program = %self.program, ?args, "starting recorder");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => CaptureError::DeviceUnavailable(
                    format!("could not start '{}': {e}", self.program),
                ),
                _ => CaptureError::Io(e),
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::DeviceUnavailable("recorder has no stdout".into()))?;

        let mut bytes = Vec::new();
        let recording = async {
            stdout.read_to_end(&mut bytes).await?;
            Ok::<_, std::io::Error>(child.wait().await?)
        };

        let status = match tokio::time::timeout(limits.total(), recording).await {
            Ok(status) => status?,
            Err(_) => {
                debug!(timeout_secs = limits.total().as_secs(), "recorder timed out");
                return Err(CaptureError::NoSpeech);
            }
        };

        if !status.success() && bytes.is_empty() {
            return Err(CaptureError::DeviceUnavailable(format!(
                "'{}' exited with {status}",
                self.program
            )));
        }
        if bytes.is_empty() {
            return Err(CaptureError::NoSpeech);
        }
        CapturedAudio::from_wav(bytes, "speech.wav")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn phrase_limit_is_substituted() {
        let recorder = CommandRecorder::from_config(&VoiceConfig::default()).unwrap();
        assert_eq!(recorder.program(), "sox");
        let args = recorder.expanded_args(&ListenLimits::new(
            Duration::from_secs(5),
            Duration::from_secs(7),
        ));
        assert_eq!(args.last().map(String::as_str), Some("7"));
        assert!(!args.iter().any(|a| a.contains(PHRASE_LIMIT_PLACEHOLDER)));
    }

    #[test]
    fn empty_command_is_device_unavailable() {
        let config = VoiceConfig {
            recorder_command: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            CommandRecorder::from_config(&config),
            Err(CaptureError::DeviceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn missing_program_is_device_unavailable() {
        let recorder = CommandRecorder::new("colloquy-no-such-recorder", Vec::new());
        let result = recorder.capture(&ListenLimits::default()).await;
        assert!(matches!(result, Err(CaptureError::DeviceUnavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_recorder_times_out_as_no_speech() {
        let recorder = CommandRecorder::new("sleep", vec!["5".into()]);
        let limits = ListenLimits::new(Duration::from_millis(100), Duration::from_millis(100));
        let result = recorder.capture(&limits).await;
        assert!(matches!(result, Err(CaptureError::NoSpeech)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn recorder_output_is_validated() {
        let recorder = CommandRecorder::new("echo", vec!["not audio".into()]);
        let result = recorder.capture(&ListenLimits::default()).await;
        assert!(matches!(result, Err(CaptureError::InvalidAudio(_))));
    }
}
