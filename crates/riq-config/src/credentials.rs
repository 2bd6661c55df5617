//! Service credentials, read from the environment only.

use riq_common::ConfigError;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const BACKEND_URL_VAR: &str = "SUPABASE_URL";
pub const BACKEND_SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";
pub const BACKEND_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

#[derive(Clone)]
pub struct Credentials {
    pub gemini_api_key: String,
    pub backend_url: String,
    pub backend_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &"[REDACTED]")
            .field("backend_url", &self.backend_url)
            .field("backend_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve credentials through `lookup`. Blank values count as unset.
    /// The backend key prefers the service key over the anon key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let gemini_api_key =
            get(GEMINI_API_KEY_VAR).ok_or(ConfigError::MissingCredential(GEMINI_API_KEY_VAR))?;
        let backend_url =
            get(BACKEND_URL_VAR).ok_or(ConfigError::MissingCredential(BACKEND_URL_VAR))?;
        let backend_key = get(BACKEND_SERVICE_KEY_VAR)
            .or_else(|| get(BACKEND_ANON_KEY_VAR))
            .ok_or(ConfigError::MissingCredential(BACKEND_SERVICE_KEY_VAR))?;

        Ok(Self {
            gemini_api_key,
            backend_url,
            backend_key,
        })
    }
}
