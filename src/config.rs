//! Application configuration loaded from environment variables.

use std::net::SocketAddr;

use sentry::types::Dsn;
use serde::Deserialize;

/// Deployment environments accepted in `ENVIRONMENT`.
pub const ENVIRONMENTS: [&str; 4] = ["development", "staging", "production", "test"];

/// Filter used when verbose logging is requested.
pub const VERBOSE_LOG_DIRECTIVES: &str = "engine_service=debug,info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment label (development, staging, production, test).
    #[serde(default = "default_environment")]
    pub environment: String,

    // === Observability ===
    /// Log filter directives, e.g. `info` or `engine_service=debug,info`.
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Sentry DSN; error reporting is off when unset or blank.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            rust_log: default_log_level(),
            verbose: false,
            metrics_enabled: default_true(),
            sentry_dsn: None,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be greater than 0".to_string());
        }

        if !ENVIRONMENTS.contains(&self.environment_lower().as_str()) {
            return Err(format!(
                "ENVIRONMENT must be one of {}, got {:?}",
                ENVIRONMENTS.join(", "),
                self.environment
            ));
        }

        if let Some(dsn) = self.sentry_dsn() {
            dsn.parse::<Dsn>()
                .map_err(|e| format!("SENTRY_DSN is invalid: {}", e))?;
        }

        Ok(())
    }

    /// The Sentry DSN, if one is configured.
    pub fn sentry_dsn(&self) -> Option<&str> {
        self.sentry_dsn
            .as_deref()
            .map(str::trim)
            .filter(|dsn| !dsn.is_empty())
    }

    /// `EnvFilter` directives for this configuration.
    pub fn log_directives(&self) -> &str {
        if self.verbose {
            VERBOSE_LOG_DIRECTIVES
        } else {
            &self.rust_log
        }
    }

    /// Socket address assembled from host and port.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("invalid bind address {}:{}: {}", self.host, self.port, e))
    }

    /// Get the environment label (lowercase).
    pub fn environment_lower(&self) -> String {
        self.environment.to_lowercase()
    }

    /// Check if running in production.
    pub fn is_production(&self) -> bool {
        self.environment_lower() == "production"
    }
}
