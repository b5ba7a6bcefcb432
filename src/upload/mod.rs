//! Transcription client
//!
//! Encodes a recorded clip as base64 JSON, issues one `POST /upload` round
//! trip to the transcription service, and decodes the structured response.

pub mod client;

pub use client::{Transcriber, TranscriptionError, UploadClient};
