//! Minimal RIFF/WAVE header inspection.
//!
//! Only enough of the container is read to reject garbage before upload
//! and to tell an empty recording from speech. Samples are never decoded.

use std::time::Duration;

use super::CaptureError;

/// Recordings shorter than this are treated as "no speech".
pub const MIN_SPEECH_DURATION: Duration = Duration::from_millis(250);

const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const FMT_MIN_LEN: usize = 16;

/// Format and size of a WAV payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub byte_rate: u32,
    /// Bytes of sample data actually present in the buffer.
    pub data_len: usize,
}

impl WavInfo {
    pub fn duration(&self) -> Duration {
        if self.byte_rate == 0 {
            return Duration::ZERO;
        }
        let millis = (self.data_len as u64).saturating_mul(1000) / u64::from(self.byte_rate);
        Duration::from_millis(millis)
    }

    pub fn is_too_short(&self) -> bool {
        self.duration() < MIN_SPEECH_DURATION
    }
}

/// Parse the header of a WAV buffer.
///
/// Recorders writing to a pipe cannot seek back to patch sizes, so a data
/// chunk declaring 0 or `u32::MAX` bytes is taken to run to the end of the
/// buffer, as is a declared size larger than what was received.
pub fn parse(bytes: &[u8]) -> Result<WavInfo, CaptureError> {
    if bytes.len() < RIFF_HEADER_LEN || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(CaptureError::InvalidAudio("not a RIFF/WAVE file".into()));
    }

    let mut format: Option<(u16, u16, u32, u32, u16)> = None;
    let mut pos = RIFF_HEADER_LEN;

    while pos + CHUNK_HEADER_LEN <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let declared = read_u32(bytes, pos + 4);
        let body = pos + CHUNK_HEADER_LEN;
        let remaining = bytes.len() - body;

        match id {
            b"fmt " => {
                let len = declared as usize;
                if len < FMT_MIN_LEN || len > remaining {
                    return Err(CaptureError::InvalidAudio("truncated fmt chunk".into()));
                }
                format = Some((
                    read_u16(bytes, body),
                    read_u16(bytes, body + 2),
                    read_u32(bytes, body + 4),
                    read_u32(bytes, body + 8),
                    read_u16(bytes, body + 14),
                ));
            }
            b"data" => {
                let (format_tag, channels, sample_rate, byte_rate, bits_per_sample) = format
                    .ok_or_else(|| CaptureError::InvalidAudio("data chunk before fmt chunk".into()))?;
                if channels == 0 || sample_rate == 0 {
                    return Err(CaptureError::InvalidAudio(
                        "zero channels or sample rate".into(),
                    ));
                }
                let data_len = match declared {
                    0 | u32::MAX => remaining,
                    n => (n as usize).min(remaining),
                };
                return Ok(WavInfo {
                    format_tag,
                    channels,
                    sample_rate,
                    bits_per_sample,
                    byte_rate,
                    data_len,
                });
            }
            _ => {}
        }

        // Chunks are word aligned.
        let len = declared as usize;
        pos = match body.checked_add(len + (len & 1)) {
            Some(next) => next,
            None => break,
        };
    }

    Err(CaptureError::InvalidAudio("no data chunk".into()))
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Wrap raw PCM samples in a canonical 44-byte WAV header.
pub fn encode_pcm(sample_rate: u32, channels: u16, bits_per_sample: u16, data: &[u8]) -> Vec<u8> {
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = data.len() as u32;

    let mut out = Vec::with_capacity(44 + data.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_second_mono_16k() -> Vec<u8> {
        encode_pcm(16_000, 1, 16, &vec![0u8; 32_000])
    }

    #[test]
    fn parses_pcm_header() {
        let info = parse(&one_second_mono_16k()).unwrap();
        assert_eq!(info.format_tag, 1);
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 16_000);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.data_len, 32_000);
        assert_eq!(info.duration(), Duration::from_secs(1));
        assert!(!info.is_too_short());
    }

    #[test]
    fn short_recording_is_flagged() {
        let info = parse(&encode_pcm(16_000, 1, 16, &[0u8; 320])).unwrap();
        assert_eq!(info.duration(), Duration::from_millis(10));
        assert!(info.is_too_short());
    }

    #[test]
    fn streaming_sizes_run_to_end_of_buffer() {
        for marker in [0u32, u32::MAX] {
            let mut bytes = one_second_mono_16k();
            bytes[40..44].copy_from_slice(&marker.to_le_bytes());
            assert_eq!(parse(&bytes).unwrap().data_len, 32_000);
        }
    }

    #[test]
    fn truncated_data_is_clamped() {
        let mut bytes = one_second_mono_16k();
        bytes.truncate(44 + 100);
        assert_eq!(parse(&bytes).unwrap().data_len, 100);
    }

    #[test]
    fn skips_unknown_chunks() {
        let plain = one_second_mono_16k();
        let mut bytes = plain[..12].to_vec();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3, 0]);
        bytes.extend_from_slice(&plain[12..]);
        assert_eq!(parse(&bytes).unwrap().data_len, 32_000);
    }

    #[test]
    fn rejects_non_wav() {
        assert!(matches!(
            parse(b"ID3\x04 not a wav file at all"),
            Err(CaptureError::InvalidAudio(_))
        ));
        assert!(parse(b"RIFF").is_err());
    }

    #[test]
    fn rejects_data_without_fmt() {
        let mut bytes = b"RIFF\0\0\0\0WAVE".to_vec();
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        assert!(matches!(parse(&bytes), Err(CaptureError::InvalidAudio(_))));
    }

    #[test]
    fn rejects_missing_data_chunk() {
        let bytes = one_second_mono_16k();
        assert!(parse(&bytes[..36]).is_err());
    }
}
