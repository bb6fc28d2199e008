use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Runtime settings, read once from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub access_token: String,
    /// Override for the TMDB API root, mostly for local fakes.
    pub api_base: Option<String>,
    pub bind: String,
    /// Marks cookies `Secure`.
    pub production: bool,
    pub cors_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"***")
            .field("api_base", &self.api_base)
            .field("bind", &self.bind)
            .field("production", &self.production)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let access_token = get("TMDB_ACCESS_TOKEN").ok_or(ConfigError::Missing("TMDB_ACCESS_TOKEN"))?;
        let production = get("METAMOVIEX_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            access_token,
            api_base: get("TMDB_API_BASE"),
            bind: get("METAMOVIEX_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            production,
            cors_origin: get("METAMOVIEX_CORS_ORIGIN"),
        })
    }

    /// Settings for tests and local runs that never reach TMDB.
    pub fn for_tests() -> Self {
        Self {
            access_token: "test-token".to_string(),
            api_base: None,
            bind: DEFAULT_BIND.to_string(),
            production: false,
            cors_origin: None,
        }
    }
}
