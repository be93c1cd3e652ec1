/// One recognized alternative for a window of audio.
///
/// `is_final` distinguishes settled text (never revised again by the
/// engine) from provisional text that later events may restate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn finalized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// A batch of recognition results covering audio since the last event.
///
/// `results` is the engine's session-ordered result list; `first_updated`
/// is the index of the first result this event updates. Results below that
/// index were already reported by earlier events and must not be
/// reprocessed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionEvent {
    pub first_updated: usize,
    pub results: Vec<RecognitionResult>,
}

impl RecognitionEvent {
    pub fn new(first_updated: usize, results: Vec<RecognitionResult>) -> Self {
        Self {
            first_updated,
            results,
        }
    }
}

/// Signals pushed by a recognition engine over its event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSignal {
    /// The engine session is live and listening.
    Started,
    /// A batch of recognition results.
    Event(RecognitionEvent),
    /// The session ended, whether by explicit stop or on its own
    /// (silence timeout, end of scripted input).
    Ended,
    /// A mid-session engine failure. The session is over; no retry.
    Error { reason: String },
}
