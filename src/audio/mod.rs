pub mod backend;
pub mod clip;
pub mod microphone;
pub mod recorder;

pub use backend::{AudioBackend, AudioBackendConfig, AudioFrame, CaptureError};
pub use clip::AudioClip;
pub use microphone::MicrophoneBackend;
pub use recorder::{ClipRecorder, RecorderConfig};
