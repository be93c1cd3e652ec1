use pinscribe_annotate::AnnotatedText;
use std::time::SystemTime;

/// One finalized utterance. Created exactly once at commit time and never
/// mutated afterwards; the log holding these is append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub id: u64,
    pub text: AnnotatedText,
    pub committed_at: SystemTime,
}
