use crate::engine_trait::RecognitionEngine;
use async_trait::async_trait;
use pinscribe_core::{EngineError, EngineSignal, RecognitionEvent, RecognitionResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An engine that replays a fixed event script with a pacing delay.
///
/// On `start` it emits `Started`, then each scripted event, then `Ended`
/// (the session ending on its own, like a recognizer's silence timeout).
/// `stop` aborts the replay and emits `Ended` as the acknowledgment.
pub struct ScriptedEngine {
    script: Vec<RecognitionEvent>,
    pace: Duration,
    signal_tx: Option<mpsc::UnboundedSender<EngineSignal>>,
    task: Option<JoinHandle<()>>,
    start_count: Arc<AtomicUsize>,
    started_locales: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<RecognitionEvent>, pace: Duration) -> Self {
        Self {
            script,
            pace,
            signal_tx: None,
            task: None,
            start_count: Arc::new(AtomicUsize::new(0)),
            started_locales: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A self-contained mixed Chinese/English demo session.
    pub fn with_demo_script(pace: Duration) -> Self {
        Self::new(demo_script(), pace)
    }

    /// Shared counter of `start` calls; usable after the engine is boxed
    /// and moved into a session controller.
    pub fn start_count_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.start_count)
    }

    /// Shared log of the locale passed to each `start`, in call order.
    pub fn locale_log_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.started_locales)
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn set_signal_sender(&mut self, sender: mpsc::UnboundedSender<EngineSignal>) {
        self.signal_tx = Some(sender);
    }

    async fn start(&mut self, locale: &str) -> Result<(), EngineError> {
        let tx = self
            .signal_tx
            .clone()
            .ok_or_else(|| EngineError::Unavailable("no signal sink installed".to_string()))?;

        // A restart replaces any session still replaying
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.start_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut locales) = self.started_locales.lock() {
            locales.push(locale.to_string());
        }
        tracing::debug!(locale, "scripted engine session starting");

        let script = self.script.clone();
        let pace = self.pace;
        self.task = Some(tokio::spawn(async move {
            let _ = tx.send(EngineSignal::Started);
            for event in script {
                tokio::time::sleep(pace).await;
                if tx.send(EngineSignal::Event(event)).is_err() {
                    return;
                }
            }
            // Script exhausted: the session ends on its own
            let _ = tx.send(EngineSignal::Ended);
        }));

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), EngineError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(tx) = &self.signal_tx {
            let _ = tx.send(EngineSignal::Ended);
        }
        Ok(())
    }
}

/// Interim/final event sequence for three utterances, restating earlier
/// results the way a session-indexed recognizer does.
pub fn demo_script() -> Vec<RecognitionEvent> {
    let first = RecognitionResult::finalized("你好世界");
    let second = RecognitionResult::finalized("今天天气很好");
    vec![
        RecognitionEvent::new(0, vec![RecognitionResult::interim("你")]),
        RecognitionEvent::new(0, vec![RecognitionResult::interim("你好")]),
        RecognitionEvent::new(0, vec![first.clone()]),
        RecognitionEvent::new(1, vec![first.clone(), RecognitionResult::interim("今天")]),
        RecognitionEvent::new(1, vec![first.clone(), RecognitionResult::interim("今天天气")]),
        RecognitionEvent::new(1, vec![first.clone(), second.clone()]),
        RecognitionEvent::new(
            2,
            vec![
                first.clone(),
                second.clone(),
                RecognitionResult::interim("we can "),
            ],
        ),
        RecognitionEvent::new(
            2,
            vec![
                first,
                second,
                RecognitionResult::finalized("we can practice 中文 together"),
            ],
        ),
    ]
}
