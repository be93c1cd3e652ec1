use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Capacity of the in-UI log ring buffer, in lines.
    #[serde(default = "default_log_buffer_lines")]
    pub log_buffer_lines: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_buffer_lines: default_log_buffer_lines(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecognitionConfig {
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Opaque locale identifier handed to the engine uninterpreted.
    /// May be a composite like "zh-CN,en-US".
    #[serde(default = "default_language")]
    pub language: String,

    /// How long to wait for the engine's end-of-session acknowledgment
    /// during a language switch before starting anyway.
    #[serde(default = "default_restart_grace_ms")]
    pub restart_grace_ms: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            language: default_language(),
            restart_grace_ms: default_restart_grace_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Most recent entries shown in the transcript view.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_buffer_lines() -> usize {
    1000
}

fn default_engine() -> String {
    "scripted".to_string()
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_restart_grace_ms() -> u64 {
    100
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_max_entries() -> usize {
    200
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_valid_toml() {
        let toml_str = r#"
[general]
log_level = "debug"
log_buffer_lines = 500

[recognition]
engine = "scripted"
language = "en-US"
restart_grace_ms = 250

[display]
theme = "dark"
max_entries = 50
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_buffer_lines, 500);
        assert_eq!(config.recognition.engine, "scripted");
        assert_eq!(config.recognition.language, "en-US");
        assert_eq!(config.recognition.restart_grace_ms, 250);
        assert_eq!(config.display.theme, "dark");
        assert_eq!(config.display.max_entries, 50);
    }

    #[test]
    fn test_config_default_values() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_buffer_lines, 1000);
        assert_eq!(config.recognition.engine, "scripted");
        assert_eq!(config.recognition.language, "zh-CN");
        assert_eq!(config.recognition.restart_grace_ms, 100);
        assert_eq!(config.display.theme, "light");
        assert_eq!(config.display.max_entries, 200);
    }

    #[test]
    fn test_config_composite_language() {
        let toml_str = r#"
[recognition]
language = "zh-CN,en-US"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        // Composite locale values pass through uninterpreted
        assert_eq!(config.recognition.language, "zh-CN,en-US");
    }

    #[test]
    fn test_config_env_var_interpolation() {
        std::env::set_var("PINSCRIBE_TEST_LANG", "en-US");
        let toml_str = r#"
[recognition]
language = "${PINSCRIBE_TEST_LANG}"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.recognition.language, "en-US");
        std::env::remove_var("PINSCRIBE_TEST_LANG");
    }

    #[test]
    fn test_config_missing_env_var_error() {
        let toml_str = r#"
[general]
log_level = "${DEFINITELY_DOES_NOT_EXIST_98765}"
"#;
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("DEFINITELY_DOES_NOT_EXIST_98765"));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let toml_str = "this is not valid toml [[[";
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = std::env::temp_dir().join("pinscribe_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            r#"
[general]
log_level = "warn"

[recognition]
language = "en-US"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.recognition.language, "en-US");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_load_from_file_not_found() {
        let result = AppConfig::load_from_file(std::path::Path::new("/nonexistent/path.toml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("failed to read config file"));
    }
}
