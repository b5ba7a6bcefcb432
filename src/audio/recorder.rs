use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::backend::{AudioBackend, AudioFrame, CaptureError};
use super::clip::AudioClip;

/// Recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory recordings are written into
    pub output_dir: PathBuf,
    /// Sample rate of recorded clips
    pub sample_rate: u32,
    /// Channel count of recorded clips
    pub channels: u16,
}

/// Records one clip at a time from an audio backend into a WAV file.
///
/// `start` begins a fresh file, `stop` finalizes it and hands back the
/// `AudioClip`. Only one capture session may be active at a time.
pub struct ClipRecorder {
    config: RecorderConfig,
    backend: Box<dyn AudioBackend>,
    active: Option<ActiveClip>,
}

struct ActiveClip {
    path: PathBuf,
    started_at: DateTime<Utc>,
    writer_task: JoinHandle<Result<usize, CaptureError>>,
}

impl ClipRecorder {
    pub fn new(config: RecorderConfig, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            config,
            backend,
            active: None,
        }
    }

    /// Begin recording to a fresh local file
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| CaptureError::Storage(format!("create output directory: {}", e)))?;

        let path = self
            .config
            .output_dir
            .join(format!("note-{}.wav", uuid::Uuid::new_v4()));

        let spec = hound::WavSpec {
            channels: self.config.channels,
            sample_rate: self.config.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = hound::WavWriter::create(&path, spec)
            .map_err(|e| CaptureError::Storage(format!("create WAV file: {}", e)))?;

        let mut audio_rx = match self.backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                let _ = fs::remove_file(&path);
                return Err(e);
            }
        };

        info!(
            "Recording started: {} ({}Hz, {} channels)",
            path.display(),
            self.config.sample_rate,
            self.config.channels
        );

        let started_at = Utc::now();
        let writer_task =
            tokio::spawn(async move { write_frames(writer, &mut audio_rx).await });

        self.active = Some(ActiveClip {
            path,
            started_at,
            writer_task,
        });

        Ok(())
    }

    /// Finalize the file, release the device, and return the clip
    pub async fn stop(&mut self) -> Result<AudioClip, CaptureError> {
        let active = self.active.take().ok_or(CaptureError::NotRecording)?;

        // Stopping the backend closes the frame channel, which lets the
        // writer task drain and finalize the file.
        self.backend.stop().await?;

        let sample_count = active
            .writer_task
            .await
            .map_err(|_| CaptureError::Storage("writer task panicked".to_string()))??;

        let duration_seconds =
            sample_count as f64 / (self.config.sample_rate as f64 * self.config.channels as f64);

        info!(
            "Recording finalized: {} ({:.1}s, {} samples)",
            active.path.display(),
            duration_seconds,
            sample_count
        );

        Ok(AudioClip {
            path: active.path,
            format: "wav".to_string(),
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
            duration_seconds,
            recorded_at: active.started_at,
        })
    }

    /// Whether a recording is currently in progress
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }
}

async fn write_frames(
    mut writer: hound::WavWriter<BufWriter<File>>,
    audio_rx: &mut mpsc::Receiver<AudioFrame>,
) -> Result<usize, CaptureError> {
    let mut sample_count = 0usize;

    while let Some(frame) = audio_rx.recv().await {
        for &sample in &frame.samples {
            writer
                .write_sample(sample)
                .map_err(|e| CaptureError::Storage(format!("write sample: {}", e)))?;
        }
        sample_count += frame.samples.len();
    }

    if let Err(e) = writer.finalize() {
        warn!("Failed to finalize WAV writer: {}", e);
        return Err(CaptureError::Storage(format!("finalize WAV file: {}", e)));
    }

    Ok(sample_count)
}
