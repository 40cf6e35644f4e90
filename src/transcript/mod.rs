//! Live transcription of both sides of the conversation
//!
//! Agent and user transcripts arrive as two independent sequences. Each one
//! is kept in arrival order keyed by segment id, and the conversation is
//! rebuilt from both on every change.

pub mod merge;
pub mod sequence;
pub mod types;

pub use merge::{merge_transcripts, Conversation};
pub use sequence::TranscriptSequence;
pub use types::{Message, Speaker, TranscriptSegment};
