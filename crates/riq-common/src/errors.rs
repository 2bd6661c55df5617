use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum RiqError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("ai error: {0}")]
    Ai(String),
}
