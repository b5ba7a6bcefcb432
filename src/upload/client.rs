use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::audio::AudioClip;
use crate::transcript::TranscriptionResult;

/// Errors from the transcription client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptionError {
    /// Non-2xx response; carries the server's detail message when it sent one
    #[error("{0}")]
    Server(String),

    /// 2xx response whose body did not match the expected shape
    #[error("failed to decode transcription response")]
    Decode,

    /// Connectivity, TLS, or timeout failure before a response arrived
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Port for clip transcription.
///
/// The session controller holds this seam so tests can substitute a
/// scripted implementation for the HTTP client.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Upload a finalized clip and await the decoded analysis.
    ///
    /// One blocking round trip per call; callers serialize concurrent use.
    async fn transcribe(&self, clip: &AudioClip)
        -> Result<TranscriptionResult, TranscriptionError>;
}

#[derive(Debug, Serialize)]
struct UploadRequest {
    audio_base64: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP transcription client for the upload endpoint
pub struct UploadClient {
    upload_url: String,
    client: reqwest::Client,
}

impl UploadClient {
    pub fn new(upload_url: String) -> Self {
        Self {
            upload_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for UploadClient {
    async fn transcribe(
        &self,
        clip: &AudioClip,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let bytes = clip
            .read_bytes()
            .await
            .map_err(|e| TranscriptionError::Transport(format!("read clip: {}", e)))?;

        let body = UploadRequest {
            audio_base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
        };

        info!(
            "Uploading clip: {} ({} bytes, {:.1}s)",
            clip.path.display(),
            bytes.len(),
            clip.duration_seconds
        );

        let response = self
            .client
            .post(&self.upload_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.detail)
                .unwrap_or_else(|_| format!("Server error {}", status.as_u16()));
            return Err(TranscriptionError::Server(detail));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        debug!("Upload response: {} bytes", text.len());

        let result =
            TranscriptionResult::parse(&text).map_err(|_| TranscriptionError::Decode)?;

        info!("Received analysis with {} turns", result.turns.len());

        Ok(result)
    }
}
