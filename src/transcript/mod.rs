//! Conversation data model
//!
//! The typed shape of a transcription result: an ordered list of diarized
//! turns with tone analysis, confidence, and summaries, decoded from the
//! upload response and given client-side identity.

pub mod markup;
pub mod model;

pub use markup::strip_tags;
pub use model::{ConversationTurn, ToneAnalysis, TranscriptionResult};
