use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The recognition engine collaborator is absent in this environment.
    /// Reported once at session-start attempt; not retried.
    #[error("recognition engine unavailable: {0}")]
    Unavailable(String),

    /// The engine reported a mid-session failure. The session transitions
    /// to stopped; an explicit user-initiated restart is required.
    #[error("recognition engine error: {0}")]
    Runtime(String),
}
