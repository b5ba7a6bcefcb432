// Integration tests for the clip recorder
//
// A scripted backend stands in for the microphone and feeds synthetic
// frames. These tests verify the WAV file lifecycle: one finalized clip per
// start/stop cycle, correct format metadata, and the capture guards.

use tempfile::TempDir;
use tokio::sync::mpsc;
use voice_notes::{
    AudioBackend, AudioClip, AudioFrame, CaptureError, ClipRecorder, RecorderConfig,
};

/// Backend that plays a fixed set of frames and then closes the channel
struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    capturing: bool,
}

impl ScriptedBackend {
    fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing {
            return Err(CaptureError::AlreadyRecording);
        }

        let (tx, rx) = mpsc::channel(64);
        let frames = self.frames.clone();
        tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });

        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn frames(count: usize, samples_per_frame: usize) -> Vec<AudioFrame> {
    (0..count)
        .map(|i| AudioFrame {
            samples: vec![(i % 100) as i16; samples_per_frame],
            sample_rate: 44100,
            channels: 1,
            timestamp_ms: (i * 10) as u64,
        })
        .collect()
}

fn recorder(output_dir: &TempDir, backend: ScriptedBackend) -> ClipRecorder {
    ClipRecorder::new(
        RecorderConfig {
            output_dir: output_dir.path().to_path_buf(),
            sample_rate: 44100,
            channels: 1,
        },
        Box::new(backend),
    )
}

#[tokio::test]
async fn start_stop_produces_finalized_wav_clip() {
    let temp_dir = TempDir::new().unwrap();
    // 10 frames x 441 samples = 0.1s at 44.1kHz mono
    let mut rec = recorder(&temp_dir, ScriptedBackend::new(frames(10, 441)));

    rec.start().await.unwrap();
    assert!(rec.is_recording());

    let clip = rec.stop().await.unwrap();
    assert!(!rec.is_recording());

    assert_eq!(clip.format, "wav");
    assert_eq!(clip.sample_rate, 44100);
    assert_eq!(clip.channels, 1);
    assert!((clip.duration_seconds - 0.1).abs() < 1e-6);
    assert!(clip.path.exists(), "Clip file should exist");

    // The file on disk round-trips the same metadata
    let probed = AudioClip::probe(&clip.path).unwrap();
    assert_eq!(probed.sample_rate, 44100);
    assert_eq!(probed.channels, 1);
    assert!((probed.duration_seconds - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn each_cycle_uses_a_fresh_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut rec = recorder(&temp_dir, ScriptedBackend::new(frames(2, 441)));

    rec.start().await.unwrap();
    let first = rec.stop().await.unwrap();

    rec.start().await.unwrap();
    let second = rec.stop().await.unwrap();

    assert_ne!(first.path, second.path, "Clips never share a file");
    assert!(first.path.exists());
    assert!(second.path.exists());
}

#[tokio::test]
async fn start_while_recording_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut rec = recorder(&temp_dir, ScriptedBackend::new(frames(2, 441)));

    rec.start().await.unwrap();
    assert_eq!(rec.start().await, Err(CaptureError::AlreadyRecording));

    // The active recording is unaffected
    let clip = rec.stop().await.unwrap();
    assert!(clip.path.exists());
}

#[tokio::test]
async fn stop_without_recording_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut rec = recorder(&temp_dir, ScriptedBackend::new(vec![]));

    let err = rec.stop().await.unwrap_err();
    assert_eq!(err, CaptureError::NotRecording);
}

#[tokio::test]
async fn empty_capture_yields_zero_duration_clip() {
    let temp_dir = TempDir::new().unwrap();
    let mut rec = recorder(&temp_dir, ScriptedBackend::new(vec![]));

    rec.start().await.unwrap();
    let clip = rec.stop().await.unwrap();

    assert_eq!(clip.duration_seconds, 0.0);
    assert!(clip.path.exists(), "Even an empty clip is finalized to disk");
}
