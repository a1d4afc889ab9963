use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StrokeRiskError};
use crate::locale::Locale;

/// Main configuration structure loaded from stroke_risk.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Model artifact and display settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemConfig {
    pub model_path: PathBuf,
    #[serde(default)]
    pub locale: Locale,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/stroke_model.json"),
            locale: Locale::Fr,
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: std::net::SocketAddr,
    pub request_timeout_ms: u64,
    /// Allow cross-origin calls to the JSON API
    pub cors_any: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: std::net::SocketAddr::from(([127, 0, 0, 1], 8501)),
            request_timeout_ms: 10_000,
            cors_any: false,
        }
    }
}

/// Log filter used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "stroke_risk=info,tower_http=info";

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses STROKE_RISK_CONFIG or defaults to "stroke_risk.toml".
    ///
    /// Call [`load_env_file`] and install the tracing subscriber first so the
    /// warnings emitted here are not lost.
    pub fn load() -> Result<Self> {
        load_env_file();

        let config_path = std::env::var("STROKE_RISK_CONFIG")
            .unwrap_or_else(|_| "stroke_risk.toml".to_string());

        let mut config = Self::from_file_or_default(&config_path)?;
        config.apply_env_overrides()?;
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`; a missing file logs a warning and yields defaults
    pub fn from_file_or_default(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(_) => {
                tracing::warn!("Config file {} not found, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Env-first: STROKE_RISK_* variables win over the file
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("STROKE_RISK_MODEL_PATH") {
            self.system.model_path = PathBuf::from(path);
            tracing::debug!("STROKE_RISK_MODEL_PATH env override applied");
        }
        if let Ok(locale) = std::env::var("STROKE_RISK_LOCALE") {
            self.system.locale = locale
                .parse()
                .map_err(|message| StrokeRiskError::Config { message })?;
            tracing::debug!("STROKE_RISK_LOCALE env override applied");
        }
        if let Ok(bind) = std::env::var("STROKE_RISK_HTTP_BIND") {
            self.http.bind = bind.parse().map_err(|e| StrokeRiskError::Config {
                message: format!("STROKE_RISK_HTTP_BIND '{}' is not a socket address: {}", bind, e),
            })?;
        }
        if let Ok(timeout) = std::env::var("STROKE_RISK_HTTP_REQUEST_TIMEOUT_MS") {
            self.http.request_timeout_ms = parse_timeout_ms(&timeout)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.system.model_path.as_os_str().is_empty() {
            return Err(StrokeRiskError::Config {
                message: "system.model_path must not be empty".to_string(),
            });
        }
        if self.http.request_timeout_ms == 0 {
            return Err(StrokeRiskError::Config {
                message: "http.request_timeout_ms must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Load STROKE_RISK_ENV_FILE if set, else ./.env; missing files are fine.
///
/// Variables already in the environment are never overwritten, so calling
/// this more than once is harmless.
pub fn load_env_file() {
    if let Ok(env_path) = std::env::var("STROKE_RISK_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::from_path(".env");
    }
}

fn parse_timeout_ms(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|e| StrokeRiskError::Config {
        message: format!(
            "STROKE_RISK_HTTP_REQUEST_TIMEOUT_MS '{}' is not a number of milliseconds: {}",
            raw, e
        ),
    })
}
