//! Configuration schema. Every section has defaults so partial files work.

use serde::{Deserialize, Serialize};

/// Language model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Maximum tokens in one model reply (valid range: 1-8192).
    pub max_output_tokens: u32,
    /// Whole-request timeout in seconds (valid range: 1-600).
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.7,
            max_output_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

/// Data backend settings. Endpoint and key come from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Per-request timeout in seconds (valid range: 1-600).
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Conversation session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tool-call rounds allowed per user turn (valid range: 1-20).
    pub max_tool_rounds: u32,
    /// Hold back data-changing tools until the user has said yes.
    pub require_confirmation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 5,
            require_confirmation: false,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing` filter directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "riq=debug",
            Self::Info => "riq=info",
            Self::Warning => "riq=warn",
            Self::Error => "riq=error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RiqConfig {
    pub model: ModelConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RiqConfig::default();
        assert_eq!(config.model.model, "gemini-2.0-flash");
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.model.max_output_tokens, 1024);
        assert_eq!(config.session.max_tool_rounds, 5);
        assert!(!config.session.require_confirmation);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: LoggingConfig = toml::from_str("level = \"WARNING\"").unwrap();
        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(config.level.directive(), "riq=warn");
    }
}
