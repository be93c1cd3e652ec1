use crate::engine_trait::RecognitionEngine;
use pinscribe_core::EngineError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Exclusive owner of the single recognition-engine session handle.
///
/// At most one session is active at a time. Explicit start/stop are
/// idempotent-safe; a language switch tears the old session down, waits
/// up to a grace period for the engine's end-of-session acknowledgment,
/// then starts with the new locale. A newer switch supersedes a pending
/// delayed start (epoch check), so two concurrent sessions never exist.
pub struct SessionController {
    engine: Arc<Mutex<Box<dyn RecognitionEngine>>>,
    locale: String,
    grace: Duration,
    running: bool,
    epoch: Arc<AtomicU64>,
    ended: watch::Sender<u64>,
    pending_start: Option<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(
        engine: Box<dyn RecognitionEngine>,
        locale: impl Into<String>,
        grace: Duration,
    ) -> Self {
        let (ended, _) = watch::channel(0);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            locale: locale.into(),
            grace,
            running: false,
            epoch: Arc::new(AtomicU64::new(0)),
            ended,
            pending_start: None,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start a session with the current locale. No-op when one is already
    /// running.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        self.supersede_pending();
        if self.running {
            tracing::warn!("session already running, ignoring start");
            return Ok(());
        }
        self.engine.lock().await.start(&self.locale).await?;
        self.running = true;
        Ok(())
    }

    /// Stop the session. No-op while idle.
    pub async fn stop(&mut self) -> Result<(), EngineError> {
        self.supersede_pending();
        if !self.running {
            return Ok(());
        }
        self.engine.lock().await.stop().await?;
        self.running = false;
        Ok(())
    }

    /// The engine reported its session live.
    pub fn on_session_started(&mut self) {
        self.running = true;
    }

    /// The engine's session ended, by explicit stop or on its own. Also
    /// the end-of-session acknowledgment a pending language switch waits on.
    pub fn on_session_ended(&mut self) {
        self.running = false;
        self.ended.send_modify(|acks| *acks += 1);
    }

    /// Mid-session engine failure: mirrors an ended session. No automatic
    /// retry; an explicit start is required.
    pub fn on_session_error(&mut self, reason: &str) {
        tracing::warn!(reason, "engine session error");
        self.on_session_ended();
    }

    /// Adopt `locale` for all future sessions. If one is running, restart
    /// it: stop, await the ack up to the grace period, start regardless.
    pub async fn switch_language(&mut self, locale: impl Into<String>) -> Result<(), EngineError> {
        self.locale = locale.into();
        let mid_switch = self
            .pending_start
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false);
        if !self.running && !mid_switch {
            // Takes effect on the next start
            return Ok(());
        }

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        // Subscribe before stopping so the ack cannot slip past the waiter
        let mut ended_rx = self.ended.subscribe();

        if self.running {
            self.engine.lock().await.stop().await?;
            self.running = false;
        }

        if let Some(handle) = self.pending_start.take() {
            handle.abort();
        }

        let engine = Arc::clone(&self.engine);
        let current_epoch = Arc::clone(&self.epoch);
        let grace = self.grace;
        let locale = self.locale.clone();
        self.pending_start = Some(tokio::spawn(async move {
            if timeout(grace, ended_rx.changed()).await.is_err() {
                tracing::debug!(
                    grace_ms = grace.as_millis() as u64,
                    "no end-of-session ack within grace period, starting anyway"
                );
            }
            if current_epoch.load(Ordering::SeqCst) != epoch {
                // A newer switch superseded this start
                return;
            }
            if let Err(error) = engine.lock().await.start(&locale).await {
                tracing::warn!("restart after language switch failed: {error}");
            }
        }));

        Ok(())
    }

    // Any explicit operation outranks a delayed start left over from a
    // language switch.
    fn supersede_pending(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending_start.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted_engine::ScriptedEngine;
    use pinscribe_core::{EngineSignal, RecognitionEvent, RecognitionResult};
    use tokio::sync::mpsc;

    fn scripted(pace: Duration) -> ScriptedEngine {
        ScriptedEngine::new(
            vec![RecognitionEvent::new(
                0,
                vec![RecognitionResult::finalized("你好")],
            )],
            pace,
        )
    }

    fn controller_with_probe(
        pace: Duration,
        grace: Duration,
    ) -> (
        SessionController,
        mpsc::UnboundedReceiver<EngineSignal>,
        Arc<std::sync::atomic::AtomicUsize>,
        Arc<std::sync::Mutex<Vec<String>>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut engine = scripted(pace);
        let count = engine.start_count_handle();
        let locales = engine.locale_log_handle();
        engine.set_signal_sender(tx);
        let controller = SessionController::new(Box::new(engine), "zh-CN", grace);
        (controller, rx, count, locales)
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (mut controller, _rx, count, _locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(50));

        controller.start().await.unwrap();
        controller.start().await.unwrap();

        assert!(controller.is_running());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_noop() {
        let (mut controller, mut rx, _count, _locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(50));

        controller.stop().await.unwrap();
        assert!(!controller.is_running());
        // No Ended acknowledgment was requested from the engine
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_error_mirrors_ended_and_allows_restart() {
        let (mut controller, _rx, count, _locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(50));

        controller.start().await.unwrap();
        controller.on_session_error("audio-capture");
        assert!(!controller.is_running());

        // The system stays usable: an explicit restart works
        controller.start().await.unwrap();
        assert!(controller.is_running());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_switch_language_while_idle_only_stores_locale() {
        let (mut controller, _rx, count, _locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(50));

        controller.switch_language("en-US").await.unwrap();
        assert_eq!(controller.locale(), "en-US");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_switch_language_restarts_after_ack() {
        let (mut controller, mut rx, count, locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(100));

        controller.start().await.unwrap();
        assert_eq!(rx.recv().await, Some(EngineSignal::Started));

        controller.switch_language("en-US").await.unwrap();
        // Engine acknowledged the stop
        assert_eq!(rx.recv().await, Some(EngineSignal::Ended));
        controller.on_session_ended();

        // The delayed start fires once the ack is observed
        let signal = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out");
        assert_eq!(signal, Some(EngineSignal::Started));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(*locales.lock().unwrap(), vec!["zh-CN", "en-US"]);
    }

    #[tokio::test]
    async fn test_switch_language_starts_anyway_without_ack() {
        let (mut controller, mut rx, count, _locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(20));

        controller.start().await.unwrap();
        assert_eq!(rx.recv().await, Some(EngineSignal::Started));

        controller.switch_language("en-US").await.unwrap();
        // Never deliver the ack to the controller; the grace period
        // elapses and the start fires regardless
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_newer_switch_supersedes_pending_start() {
        let (mut controller, _rx, _count, locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(100));

        controller.start().await.unwrap();
        controller.switch_language("en-US").await.unwrap();
        // Second switch before the first grace period elapses
        controller.switch_language("zh-CN,en-US").await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        let log = locales.lock().unwrap().clone();
        // The en-US start never fires; last writer wins
        assert_eq!(log, vec!["zh-CN", "zh-CN,en-US"]);
        assert_eq!(controller.locale(), "zh-CN,en-US");
    }

    #[tokio::test]
    async fn test_stop_supersedes_pending_start() {
        let (mut controller, _rx, count, _locales) =
            controller_with_probe(Duration::from_secs(30), Duration::from_millis(50));

        controller.start().await.unwrap();
        controller.switch_language("en-US").await.unwrap();
        controller.stop().await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        // The pending restart was cancelled by the explicit stop
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!controller.is_running());
    }
}
