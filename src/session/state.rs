use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::audio::CaptureError;
use crate::transcript::TranscriptionResult;
use crate::upload::TranscriptionError;

/// Phase of the recording session state machine.
///
/// One enum, one phase: recording and processing cannot be true at the same
/// time by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Recording,
    Processing,
}

/// Terminal failure of one session cycle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionFailure {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// Errors returned from controller actions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Action rejected while a cycle is still processing; not queued
    #[error("a session cycle is already in progress")]
    Busy,

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Published view of the session, replaced on every transition.
///
/// The controller is the single writer; everything else observes through a
/// watch channel (last-write-wins).
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// Set while recording, for elapsed-time display
    pub recording_since: Option<DateTime<Utc>>,
    /// Most recent failure; cleared by the next successful action
    pub last_error: Option<SessionFailure>,
    /// Most recent successful result; preserved across failed attempts
    pub last_result: Option<TranscriptionResult>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            recording_since: None,
            last_error: None,
            last_result: None,
        }
    }
}

impl SessionSnapshot {
    pub fn is_recording(&self) -> bool {
        self.phase == SessionPhase::Recording
    }

    pub fn is_processing(&self) -> bool {
        self.phase == SessionPhase::Processing
    }
}
