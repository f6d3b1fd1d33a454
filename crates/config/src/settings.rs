//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{AnalyzerConfig, ConfigError, DecisionEngineConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, keyword analyzer fallback allowed
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Analyzer selection and LLM connection
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Routing thresholds
    #[serde(default)]
    pub decision_engine: DecisionEngineConfig,

    /// Ticket store snapshot and seed data
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate all sections, failing on the first invalid value
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.analyzer.validate(self.environment.is_strict())?;
        self.decision_engine.validate()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::invalid("server.port", "cannot be 0"));
        }

        if server.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_seconds",
                "must be at least 1",
            ));
        }

        if server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "cannot be empty"));
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.persistence.snapshot_path {
            if path.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "persistence.snapshot_path",
                    "cannot be empty when set",
                ));
            }
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins; empty means `http://localhost:3000`
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Ticket store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// JSON snapshot file; `None` keeps tickets in memory only
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Insert demonstration tickets when the store starts empty
    #[serde(default = "default_true")]
    pub load_seed_data: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            load_seed_data: true,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`TRIAGE__` prefix, e.g. `TRIAGE__SERVER__PORT`)
/// 2. config/{env}.yaml or config/{env}.toml (if env specified)
/// 3. config/default.yaml or config/default.toml
///
/// A given `env` also sets [`Settings::environment`], overriding the files.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same as [`load_settings`] with an explicit configuration directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TRIAGE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    // The named environment wins over any `environment` key in the files
    if let Some(env_name) = env {
        settings.environment = parse_environment(env_name)?;
    }

    settings.validate()?;

    Ok(settings)
}

fn parse_environment(name: &str) -> Result<RuntimeEnvironment, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "development" | "dev" => Ok(RuntimeEnvironment::Development),
        "staging" => Ok(RuntimeEnvironment::Staging),
        "production" | "prod" => Ok(RuntimeEnvironment::Production),
        other => Err(ConfigError::Environment(format!(
            "unknown environment '{}', expected development, staging or production",
            other
        ))),
    }
}
