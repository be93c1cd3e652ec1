use crate::entry::TranscriptEntry;
use pinscribe_annotate::{annotate, AnnotatedText, PhoneticLookup};
use pinscribe_core::{EntryView, RecognitionEvent, TranscriptState};
use std::time::SystemTime;

/// Folds a stream of recognition events into an append-only log of
/// finalized entries plus a single in-progress utterance buffer.
///
/// One event is processed at a time, synchronously, in delivery order.
/// Per event, either exactly one entry is committed (when the event carries
/// final text) or the current utterance is replaced wholesale (when it
/// carries only interim text). Committed entries never change.
pub struct TranscriptAggregator {
    entries: Vec<TranscriptEntry>,
    current: AnnotatedText,
    /// Results below this session index were already finalized and
    /// committed; events restating them have that portion skipped.
    committed_below: usize,
    next_id: u64,
}

impl TranscriptAggregator {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: AnnotatedText::default(),
            committed_below: 0,
            next_id: 1,
        }
    }

    /// Process one event. Returns `true` when an entry was committed.
    pub fn apply<L: PhoneticLookup>(&mut self, event: &RecognitionEvent, lookup: &L) -> bool {
        let start = if event.first_updated < self.committed_below {
            tracing::debug!(
                first_updated = event.first_updated,
                committed_below = self.committed_below,
                "skipping already-committed results in event"
            );
            self.committed_below
        } else {
            event.first_updated
        };

        let mut final_text = String::new();
        let mut interim_text = String::new();
        let mut last_final_index = None;

        for (index, result) in event.results.iter().enumerate().skip(start) {
            if result.is_final {
                final_text.push_str(&result.text);
                last_final_index = Some(index);
            } else {
                interim_text.push_str(&result.text);
            }
        }

        if !final_text.is_empty() {
            // A final result supersedes interim text up to this point;
            // trailing interim text in the same event is discarded.
            let entry = TranscriptEntry {
                id: self.next_id,
                text: annotate(&final_text, lookup),
                committed_at: SystemTime::now(),
            };
            self.next_id += 1;
            tracing::debug!(id = entry.id, text = %final_text, "committing entry");
            self.entries.push(entry);
            self.current = AnnotatedText::default();
            if let Some(index) = last_final_index {
                self.committed_below = self.committed_below.max(index + 1);
            }
            true
        } else {
            // Wholesale replacement; an empty interim string clears the line
            self.current = annotate(&interim_text, lookup);
            false
        }
    }

    /// Committed entries in commit order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn current(&self) -> &AnnotatedText {
        &self.current
    }

    /// Clears the log and the current utterance together. Does not touch
    /// the low-water-mark: that is recognition-session state, and reset
    /// has no effect on an in-flight session.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.current = AnnotatedText::default();
    }

    /// Discards the in-progress utterance without committing it, for
    /// session end. Uncommitted interim text is never promoted to the log.
    pub fn discard_current(&mut self) {
        self.current = AnnotatedText::default();
    }

    /// Read-only snapshot for presentation.
    pub fn snapshot(&self) -> TranscriptState {
        TranscriptState {
            entries: self
                .entries
                .iter()
                .map(|entry| EntryView {
                    id: entry.id,
                    text: entry.text.display_string(),
                    committed_at: entry.committed_at,
                })
                .collect(),
            current: self.current.display_string(),
            ..Default::default()
        }
    }
}

impl Default for TranscriptAggregator {
    fn default() -> Self {
        Self::new()
    }
}
