use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

use super::state::{SessionError, SessionPhase, SessionSnapshot};
use crate::audio::{AudioClip, CaptureError, ClipRecorder};
use crate::upload::Transcriber;

/// Mediates between audio capture and the transcription client.
///
/// Drives the `Idle → Recording → Processing → Idle` cycle: start/stop the
/// recorder, hand the finalized clip to the transcriber on one background
/// task, and publish every state transition through a watch channel. At most
/// one cycle is in flight; actions during `Processing` are rejected with
/// `SessionError::Busy` rather than queued.
pub struct SessionController {
    recorder: Mutex<ClipRecorder>,
    transcriber: Arc<dyn Transcriber>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    pub fn new(recorder: ClipRecorder, transcriber: Arc<dyn Transcriber>) -> Self {
        let (state_tx, _) = watch::channel(SessionSnapshot::default());

        Self {
            recorder: Mutex::new(recorder),
            transcriber,
            state_tx,
        }
    }

    /// Subscribe to session state. Publishes on every transition,
    /// last-write-wins.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// Current session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Start a new recording. Valid only while idle.
    pub async fn start(&self) -> Result<(), SessionError> {
        match self.state_tx.borrow().phase {
            SessionPhase::Processing => return Err(SessionError::Busy),
            SessionPhase::Recording => return Err(CaptureError::AlreadyRecording.into()),
            SessionPhase::Idle => {}
        }

        let mut recorder = self.recorder.lock().await;
        match recorder.start().await {
            Ok(()) => {
                self.state_tx.send_modify(|s| {
                    s.phase = SessionPhase::Recording;
                    s.recording_since = Some(Utc::now());
                    s.last_error = None;
                });
                info!("Session: recording");
                Ok(())
            }
            Err(e) => {
                error!("Failed to start recording: {}", e);
                self.state_tx
                    .send_modify(|s| s.last_error = Some(e.clone().into()));
                Err(e.into())
            }
        }
    }

    /// Stop recording and kick off the upload. Valid only while recording.
    ///
    /// Transitions to `Processing` before the network call resolves so the
    /// UI can show its busy indicator immediately; the upload runs on one
    /// spawned task and publishes the result or error when it completes.
    pub async fn stop(&self) -> Result<(), SessionError> {
        match self.state_tx.borrow().phase {
            SessionPhase::Processing => return Err(SessionError::Busy),
            SessionPhase::Idle => return Err(CaptureError::NotRecording.into()),
            SessionPhase::Recording => {}
        }

        let clip = {
            let mut recorder = self.recorder.lock().await;
            match recorder.stop().await {
                Ok(clip) => clip,
                Err(e) => {
                    error!("Failed to stop recording: {}", e);
                    self.state_tx.send_modify(|s| {
                        s.phase = SessionPhase::Idle;
                        s.recording_since = None;
                        s.last_error = Some(e.clone().into());
                    });
                    return Err(e.into());
                }
            }
        };

        self.state_tx.send_modify(|s| {
            s.phase = SessionPhase::Processing;
            s.recording_since = None;
        });
        info!("Session: processing clip ({:.1}s)", clip.duration_seconds);

        let transcriber = Arc::clone(&self.transcriber);
        let state_tx = self.state_tx.clone();
        tokio::spawn(async move {
            finish_cycle(transcriber, state_tx, clip).await;
        });

        Ok(())
    }
}

/// Await the upload, then publish the outcome and return to idle.
/// No cancellation path: once started, the result or error is awaited.
async fn finish_cycle(
    transcriber: Arc<dyn Transcriber>,
    state_tx: watch::Sender<SessionSnapshot>,
    clip: AudioClip,
) {
    let outcome = transcriber.transcribe(&clip).await;

    // The clip is consumed exactly once; remove it either way.
    if let Err(e) = tokio::fs::remove_file(&clip.path).await {
        warn!("Failed to remove consumed clip {}: {}", clip.path.display(), e);
    }

    state_tx.send_modify(|s| {
        s.phase = SessionPhase::Idle;
        match outcome {
            Ok(result) => {
                info!("Session: idle ({} turns)", result.turns.len());
                s.last_result = Some(result);
                s.last_error = None;
            }
            Err(e) => {
                // Keep the previously displayed result; only a new success
                // replaces it.
                error!("Transcription failed: {}", e);
                s.last_error = Some(e.into());
            }
        }
    });
}
