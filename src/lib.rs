pub mod audio;
pub mod config;
pub mod session;
pub mod transcript;
pub mod ui;
pub mod upload;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioClip, AudioFrame, CaptureError, ClipRecorder,
    MicrophoneBackend, RecorderConfig,
};
pub use config::Config;
pub use session::{SessionController, SessionError, SessionFailure, SessionPhase, SessionSnapshot};
pub use transcript::{ConversationTurn, ToneAnalysis, TranscriptionResult};
pub use ui::ChatApp;
pub use upload::{Transcriber, TranscriptionError, UploadClient};
