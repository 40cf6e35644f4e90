use super::types::TranscriptSegment;
use std::collections::HashMap;

/// Transcript segments from a single source, in arrival order
///
/// Segments are keyed by id. A revision of an existing segment replaces its
/// text in place; it keeps the slot and first receipt time of the original.
#[derive(Debug, Clone, Default)]
pub struct TranscriptSequence {
    segments: Vec<TranscriptSegment>,
    positions: HashMap<String, usize>,
    revision: u64,
}

impl TranscriptSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new segment or revise an existing one.
    ///
    /// Returns `true` when the sequence changed.
    pub fn upsert(&mut self, segment: TranscriptSegment) -> bool {
        if let Some(&index) = self.positions.get(&segment.id) {
            let existing = &mut self.segments[index];
            if existing.text == segment.text && existing.is_final == segment.is_final {
                return false;
            }
            existing.text = segment.text;
            existing.is_final = segment.is_final;
        } else {
            self.positions.insert(segment.id.clone(), self.segments.len());
            self.segments.push(segment);
        }

        self.revision += 1;
        true
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    /// Monotonic counter bumped on every change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn clear(&mut self) {
        if self.segments.is_empty() {
            return;
        }
        self.segments.clear();
        self.positions.clear();
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
