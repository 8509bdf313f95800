//! Configuration module
//!
//! Handles loading and managing configuration.

#![allow(dead_code)]

pub mod env;
mod file;
mod profile;

pub use env::EnvConfig;
pub use file::{ConfigFile, EnvironmentConfig};
pub use profile::{ProfileManager, StackProfile, SuiteProfile};

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default target host
    pub default_host: String,

    /// Default target port
    pub default_port: u16,

    /// Default number of test rounds
    pub default_rounds: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Directory holding golden files
    pub testdata_dir: String,

    /// Stack defaults
    pub stack: StackDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_host: "127.0.0.1".to_string(),
            default_port: 8080,
            default_rounds: 1,
            timeout_secs: 30,
            testdata_dir: "testdata".to_string(),
            stack: StackDefaults::default(),
        }
    }
}

/// Container stack defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StackDefaults {
    /// PostgreSQL image
    pub db_image: String,

    /// accountd image
    pub service_image: String,

    /// Host port mapped to the database
    pub db_port: u16,

    /// Host port mapped to the service
    pub http_port: u16,

    /// Bounded retry budget for database initialization
    pub init_attempts: u32,

    /// Fixed sleep between initialization attempts
    pub init_interval_secs: u64,
}

impl Default for StackDefaults {
    fn default() -> Self {
        Self {
            db_image: "postgres:16-alpine".to_string(),
            service_image: "accountd:latest".to_string(),
            db_port: 54329,
            http_port: 8080,
            init_attempts: 30,
            init_interval_secs: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_host, "127.0.0.1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_stack_defaults() {
        let stack = StackDefaults::default();
        assert_eq!(stack.db_image, "postgres:16-alpine");
        assert_eq!(stack.init_attempts, 30);
    }
}
