//! RestaurantIQ configuration.
//!
//! Settings live in a TOML file with defaults for every field; service
//! credentials come from the environment. Both are checked up front so
//! the assistant is either fully configured or not constructed at all.

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::Credentials;
pub use schema::{
    BackendConfig, LogLevel, LoggingConfig, ModelConfig, RiqConfig, SessionConfig,
};

use std::path::Path;

use riq_common::ConfigError;

/// Load and validate config from `path`, or from the platform default
/// location when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<RiqConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
