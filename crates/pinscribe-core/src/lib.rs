pub mod config;
pub mod error;
pub mod types;
pub mod view;

pub use config::AppConfig;
pub use error::{ConfigError, EngineError};
pub use types::{EngineSignal, RecognitionEvent, RecognitionResult};
pub use view::{EntryView, TranscriptState, UiCommand};
