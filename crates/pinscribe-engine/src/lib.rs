pub mod engine_trait;
pub mod registry;
pub mod scripted_engine;
pub mod session;

pub use engine_trait::RecognitionEngine;
pub use registry::EngineRegistry;
pub use scripted_engine::{demo_script, ScriptedEngine};
pub use session::SessionController;
