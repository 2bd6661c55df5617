//! Range checks for loaded configuration.

use riq_common::ConfigError;

use crate::schema::RiqConfig;

fn check_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Validate all sections, reporting the first violation.
pub fn validate(config: &RiqConfig) -> Result<(), ConfigError> {
    if config.model.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "model.model must not be empty".into(),
        ));
    }
    check_range("model.temperature", config.model.temperature, 0.0, 2.0)?;
    check_range(
        "model.max_output_tokens",
        config.model.max_output_tokens,
        1,
        8192,
    )?;
    check_range("model.timeout_secs", config.model.timeout_secs, 1, 600)?;
    check_range("backend.timeout_secs", config.backend.timeout_secs, 1, 600)?;
    check_range(
        "session.max_tool_rounds",
        config.session.max_tool_rounds,
        1,
        20,
    )?;
    Ok(())
}
