//! Configuration module

use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Artifact bundle path; the builtin bundle is used when unset
    pub artifacts: Option<PathBuf>,

    /// Environment (development, production)
    pub environment: String,

    /// Include error detail in 500 responses
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            artifacts: lookup("SCORECARD_ARTIFACTS")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),

            debug: lookup("DEBUG")
                .map(|d| matches!(d.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
