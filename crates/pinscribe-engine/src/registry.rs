use crate::engine_trait::RecognitionEngine;
use crate::scripted_engine::ScriptedEngine;
use pinscribe_core::EngineError;
use std::collections::HashMap;
use std::time::Duration;

/// Name → factory map for recognition engines. Asking for an engine that
/// is not present in this environment is the EngineUnavailable condition:
/// reported at start attempt, never retried automatically.
pub struct EngineRegistry {
    factories: HashMap<String, fn() -> Box<dyn RecognitionEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("scripted", || {
            Box::new(ScriptedEngine::with_demo_script(Duration::from_millis(600)))
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn RecognitionEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn RecognitionEngine>, EngineError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| EngineError::Unavailable(name.to_string()))
    }

    pub fn list_engines(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
