use std::time::SystemTime;

/// One committed transcript entry, rendered form, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub id: u64,
    /// Display text with inline readings, e.g. "你好（nǐ hǎo）".
    pub text: String,
    pub committed_at: SystemTime,
}

/// Snapshot of transcript state broadcast to the UI via watch channel.
///
/// Produced after every processed event; the UI never reaches into the
/// aggregator itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptState {
    /// Committed entries in commit order (oldest first).
    pub entries: Vec<EntryView>,
    /// The in-progress utterance, rendered; empty when nothing is pending.
    pub current: String,
    pub is_recording: bool,
    pub language: String,
    /// Session-local conditions surfaced to the user (engine errors etc).
    pub warnings: Vec<String>,
}

/// Commands sent from UI → main via mpsc channel.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    ToggleRecording,
    Reset,
    SwitchLanguage(String),
    Quit,
}
