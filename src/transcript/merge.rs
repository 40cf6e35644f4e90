use super::sequence::TranscriptSequence;
use super::types::{Message, Speaker, TranscriptSegment};

/// Merge agent and user transcripts into a single time-ordered conversation.
///
/// Agent segments are laid out before user segments and the result is
/// stable-sorted by first receipt time, so equal timestamps keep per-source
/// arrival order.
pub fn merge_transcripts(agent: &[TranscriptSegment], user: &[TranscriptSegment]) -> Vec<Message> {
    let mut messages: Vec<Message> = agent
        .iter()
        .map(|segment| Message::from_segment(Speaker::Agent, segment))
        .chain(user.iter().map(|segment| Message::from_segment(Speaker::User, segment)))
        .collect();

    // `sort_by_key` is stable
    messages.sort_by_key(|message| message.first_received_time);
    messages
}

/// Both transcript sequences plus the merged snapshot built from them
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    agent: TranscriptSequence,
    user: TranscriptSequence,
    messages: Vec<Message>,
    /// Source revisions the current snapshot was built from
    merged_from: (u64, u64),
    /// Bumped each time the snapshot is rebuilt
    version: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_agent(&mut self, segment: TranscriptSegment) -> bool {
        self.agent.upsert(segment)
    }

    pub fn apply_user(&mut self, segment: TranscriptSegment) -> bool {
        self.user.upsert(segment)
    }

    /// Rebuild the snapshot if either source changed since the last rebuild.
    ///
    /// Returns `true` when the snapshot was rebuilt.
    pub fn refresh(&mut self) -> bool {
        let current = (self.agent.revision(), self.user.revision());
        if current == self.merged_from {
            return false;
        }

        self.messages = merge_transcripts(self.agent.segments(), self.user.segments());
        self.merged_from = current;
        self.version += 1;
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn agent(&self) -> &TranscriptSequence {
        &self.agent
    }

    pub fn user(&self) -> &TranscriptSequence {
        &self.user
    }

    /// Changes whenever the merged snapshot is rebuilt
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop both sequences and the snapshot
    pub fn clear(&mut self) {
        self.agent.clear();
        self.user.clear();
        self.refresh();
    }
}
