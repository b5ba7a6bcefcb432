use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hound::WavReader;
use std::path::{Path, PathBuf};

/// One captured recording, finalized and ready for upload.
///
/// A clip is consumed exactly once by the upload client and is eligible for
/// deletion afterwards; there is no caching or reuse.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Local file path of the finalized recording
    pub path: PathBuf,
    /// Container/codec identifier ("wav")
    pub format: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Duration, known once the file is finalized
    pub duration_seconds: f64,
    /// When the recording started
    pub recorded_at: DateTime<Utc>,
}

impl AudioClip {
    /// Read the clip's raw bytes for upload
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Re-open a WAV file on disk and rebuild the clip metadata from it
    pub fn probe(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let reader = WavReader::open(path).context("Failed to open WAV file")?;
        let spec = reader.spec();
        let sample_count = reader.len() as f64;
        let duration_seconds = sample_count / (spec.sample_rate as f64 * spec.channels as f64);

        Ok(Self {
            path: path.to_path_buf(),
            format: "wav".to_string(),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            duration_seconds,
            recorded_at: Utc::now(),
        })
    }
}
