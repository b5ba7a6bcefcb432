use serde::Deserialize;
use uuid::Uuid;

use super::markup::strip_tags;

/// Tone analysis for one conversation turn
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToneAnalysis {
    /// Dominant tone identified (e.g. "confident", "hesitant")
    pub tone: String,
    /// Supporting qualitative notes, order preserved as received
    pub indicators: Vec<String>,
}

/// One diarized utterance turn.
///
/// The three `*_html` fields are markup-bearing text; use the display
/// accessors for tag-stripped output. `id` is assigned client-side at decode
/// time for UI list identity — the server does not supply one.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub diarization_html: String,
    pub transcription_html: String,
    pub timestamps_html: String,
    pub tone: ToneAnalysis,
    /// Confidence in the tone detection (0–100)
    pub confidence: f32,
    pub summary: String,
}

impl ConversationTurn {
    /// Speaker label with markup stripped
    pub fn speaker(&self) -> String {
        strip_tags(&self.diarization_html)
    }

    /// Transcript text with markup stripped
    pub fn text(&self) -> String {
        strip_tags(&self.transcription_html)
    }

    /// Time range with markup stripped
    pub fn time_range(&self) -> String {
        strip_tags(&self.timestamps_html)
    }
}

/// Decoded transcription/analysis result for one uploaded clip.
///
/// Replaced wholesale on each successful upload; there is no incremental
/// merge.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub fully_transcribed: bool,
    /// Conversation order, preserved exactly as received
    pub turns: Vec<ConversationTurn>,
}

impl TranscriptionResult {
    /// Decode a response body into a result, assigning fresh turn ids
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        let wire: WireResponse = serde_json::from_str(body)?;
        Ok(wire.into())
    }
}

// Wire shape of the upload response. The backend also emits optional
// fields (emotional_prosody_html, intent_html, red_flags) which are
// ignored here.
#[derive(Debug, Deserialize)]
struct WireResponse {
    full_audio_transcribed: bool,
    conversation_analysis: Vec<WireTurn>,
}

#[derive(Debug, Deserialize)]
struct WireTurn {
    diarization_html: String,
    transcription_html: String,
    timestamps_html: String,
    tone_analysis: ToneAnalysis,
    confidence: f32,
    summary: String,
}

impl From<WireResponse> for TranscriptionResult {
    fn from(wire: WireResponse) -> Self {
        Self {
            fully_transcribed: wire.full_audio_transcribed,
            turns: wire
                .conversation_analysis
                .into_iter()
                .map(|turn| ConversationTurn {
                    id: Uuid::new_v4(),
                    diarization_html: turn.diarization_html,
                    transcription_html: turn.transcription_html,
                    timestamps_html: turn.timestamps_html,
                    tone: turn.tone_analysis,
                    confidence: turn.confidence,
                    summary: turn.summary,
                })
                .collect(),
        }
    }
}
