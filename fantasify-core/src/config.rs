//! Journal configuration.
//!
//! Credentials and paths come from the environment (optionally a `.env`
//! file) and can be overridden with the `with_*` builders.

use std::path::PathBuf;

/// Environment variable overriding the Gemini model.
pub const MODEL_VAR: &str = "FANTASIFY_MODEL";

/// Environment variable overriding the data directory.
pub const DATA_DIR_VAR: &str = "FANTASIFY_DATA_DIR";

/// Configuration for creating a journal session.
#[derive(Debug, Clone, Default)]
pub struct JournalConfig {
    /// Gemini API key. Without it chapters cannot be generated.
    pub gemini_api_key: Option<String>,

    /// Unsplash access key. Without it chapters get fallback images.
    pub unsplash_access_key: Option<String>,

    /// Gemini model override.
    pub model: Option<String>,

    /// Where the journal blobs are stored.
    pub data_dir: Option<PathBuf>,
}

impl JournalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment, loading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            gemini_api_key: env_var(gemini::API_KEY_VAR),
            unsplash_access_key: env_var(crate::illustrator::ACCESS_KEY_VAR),
            model: env_var(MODEL_VAR),
            data_dir: env_var(DATA_DIR_VAR).map(PathBuf::from),
        }
    }

    pub fn with_gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn with_unsplash_access_key(mut self, key: impl Into<String>) -> Self {
        self.unsplash_access_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// The configured data directory, or the per-user default.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// `<user data dir>/fantasify`, or `./.fantasify` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("fantasify"))
        .unwrap_or_else(|| PathBuf::from(".fantasify"))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
