//! # Host Configuration
//!
//! Loaded once at startup:
//!
//! 1. Defaults
//! 2. TOML file from `--config` or `DEBUGBAR_CONFIG`
//! 3. Environment overrides
//!
//! ```toml
//! operator_key = "secret"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! cors_origins = "http://localhost:3000"
//!
//! [overlay]
//! query_flag = "debug-bar"
//! debug_enabled = true
//! ```
//!
//! ## Environment Overrides
//!
//! - `DEBUGBAR_OPERATOR_KEY`: operator Bearer key
//! - `DEBUGBAR_DEBUG`: `1`/`true`/`yes`/`on` enables verbose debugging
//! - `DEBUGBAR_CORS_ORIGINS`: comma-separated origins, or `*`

use debugbar_core::{OverlayConfig, OverlayError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DEBUGBAR_CONFIG";

/// Config files larger than this are rejected.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated allowed origins, `*` for any. Localhost only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Requests must present this key as `Authorization: Bearer <key>` to see
    /// the overlay. Every request is an operator when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_key: Option<String>,
    pub server: ServerConfig,
    pub overlay: OverlayConfig,
}

impl AppConfig {
    /// Load from `path`, or from `DEBUGBAR_CONFIG`, or defaults; then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, OverlayError> {
        let from_env = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, OverlayError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            OverlayError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(OverlayError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            OverlayError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, OverlayError> {
        toml::from_str(text).map_err(|e| OverlayError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Apply `DEBUGBAR_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("DEBUGBAR_OPERATOR_KEY").filter(|k| !k.is_empty()) {
            self.operator_key = Some(key);
        }
        if let Some(flag) = lookup("DEBUGBAR_DEBUG") {
            self.overlay.debug_enabled = parse_flag(&flag);
        }
        if let Some(origins) = lookup("DEBUGBAR_CORS_ORIGINS").filter(|o| !o.trim().is_empty()) {
            self.server.cors_origins = Some(origins);
        }
    }

    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.server.host.trim().is_empty() {
            return Err(OverlayError::Config(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.operator_key.as_deref() == Some("") {
            return Err(OverlayError::Config(
                "operator_key must not be empty when set".to_string(),
            ));
        }
        self.overlay.validate()
    }

    /// Effective configuration as TOML, operator key redacted.
    pub fn to_toml(&self) -> Result<String, OverlayError> {
        let mut shown = self.clone();
        if shown.operator_key.is_some() {
            shown.operator_key = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&shown)
            .map_err(|e| OverlayError::Config(format!("Cannot serialize configuration: {}", e)))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// =============================================================================
// TESTS
// =============================================================================
