//! Service configuration loaded from environment variables.
//!
//! Port, log path and log level are read once at startup. Readiness is the
//! one deliberately dynamic setting: it is re-read on every request that
//! reports it, see [`ReadinessSource`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Result, ServiceError};

/// Environment variable holding the readiness toggle.
pub const READY_VAR: &str = "READY";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// TCP port the HTTP server binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Append-only log file, written alongside stdout.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Log filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/var/log/app/dice.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_path: default_log_path(),
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServiceError::InvalidConfig(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        if self.log_path.as_os_str().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "LOG_PATH must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Interpret a raw `READY` value.
///
/// Unset means ready. Otherwise only `1`, `true` and `yes` (any case) count.
pub fn parse_ready(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(value) => matches!(
            value.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
    }
}

/// Where the service reads its readiness from.
#[derive(Debug, Clone, Default)]
pub enum ReadinessSource {
    /// Re-read `READY` from the process environment on every check.
    #[default]
    Environment,
    /// Programmatically toggled flag.
    Fixed(Arc<AtomicBool>),
}

impl ReadinessSource {
    /// Create a fixed source with an initial value.
    pub fn fixed(ready: bool) -> Self {
        Self::Fixed(Arc::new(AtomicBool::new(ready)))
    }

    /// Evaluate readiness now.
    pub fn is_ready(&self) -> bool {
        match self {
            Self::Environment => match std::env::var_os(READY_VAR) {
                None => true,
                // Non-UTF-8 values can never match a truthy literal.
                Some(raw) => raw.to_str().is_some_and(|v| parse_ready(Some(v))),
            },
            Self::Fixed(flag) => flag.load(Ordering::SeqCst),
        }
    }

    /// Update a fixed source. Returns false when readiness comes from the
    /// environment and cannot be set.
    pub fn set(&self, ready: bool) -> bool {
        match self {
            Self::Environment => false,
            Self::Fixed(flag) => {
                flag.store(ready, Ordering::SeqCst);
                true
            }
        }
    }

    /// Short label for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Fixed(_) => "fixed",
        }
    }
}
