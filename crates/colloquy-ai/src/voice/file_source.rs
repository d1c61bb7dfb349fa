//! Pre-recorded WAV input.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{AudioSource, CaptureError, CapturedAudio, ListenLimits};

enum Origin {
    Path(PathBuf),
    Bytes { bytes: Vec<u8>, filename: String },
}

/// Feeds an existing recording through the same pipeline as live capture.
pub struct WavFileSource {
    origin: Origin,
}

impl WavFileSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::Path(path.into()),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            origin: Origin::Bytes {
                bytes,
                filename: filename.into(),
            },
        }
    }
}

#[async_trait]
impl AudioSource for WavFileSource {
    async fn capture(&self, _limits: &ListenLimits) -> Result<CapturedAudio, CaptureError> {
        match &self.origin {
            Origin::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| {
                    CaptureError::FileUnreadable {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                CapturedAudio::from_wav(bytes, file_name(path))
            }
            Origin::Bytes { bytes, filename } => {
                CapturedAudio::from_wav(bytes.clone(), filename.clone())
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.wav")
        .to_string()
}
