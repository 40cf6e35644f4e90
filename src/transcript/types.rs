use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the conversation a segment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    User,
}

impl Speaker {
    /// Header shown above a message bubble
    pub fn display_name(&self) -> &'static str {
        match self {
            Speaker::Agent => "Restaurant Assistant",
            Speaker::User => "You",
        }
    }
}

/// A unit of speech-to-text output, possibly revised before it is final
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: String,
    pub text: String,
    pub first_received_time: DateTime<Utc>,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

impl TranscriptSegment {
    pub fn new(id: impl Into<String>, text: impl Into<String>, first_received_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            first_received_time,
            is_final: false,
        }
    }

    pub fn finalized(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// One entry of the merged conversation: a segment tagged with its speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub is_final: bool,
    pub first_received_time: DateTime<Utc>,
}

impl Message {
    pub fn from_segment(speaker: Speaker, segment: &TranscriptSegment) -> Self {
        Self {
            id: segment.id.clone(),
            speaker,
            text: segment.text.clone(),
            is_final: segment.is_final,
            first_received_time: segment.first_received_time,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.speaker == Speaker::Agent
    }
}
