use async_trait::async_trait;
use pinscribe_core::{EngineError, EngineSignal};
use tokio::sync::mpsc;

/// A speech recognition engine collaborator. Emits `EngineSignal`s over
/// the channel installed with `set_signal_sender` from `start` until the
/// session is stopped or ends on its own.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &str;
    fn set_signal_sender(&mut self, sender: mpsc::UnboundedSender<EngineSignal>);
    /// Begin a session for `locale` (an opaque identifier, possibly a
    /// composite like "zh-CN,en-US", passed through uninterpreted).
    async fn start(&mut self, locale: &str) -> Result<(), EngineError>;
    /// End the session. The engine acknowledges with `EngineSignal::Ended`.
    async fn stop(&mut self) -> Result<(), EngineError>;
}
