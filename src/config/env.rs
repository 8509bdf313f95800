//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

#![allow(dead_code)]

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "ACCOUNTD_PROBE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Target host from ACCOUNTD_PROBE_HOST
    pub host: Option<String>,
    /// Target port from ACCOUNTD_PROBE_PORT
    pub port: Option<u16>,
    /// Timeout from ACCOUNTD_PROBE_TIMEOUT
    pub timeout: Option<u64>,
    /// Rounds from ACCOUNTD_PROBE_ROUNDS
    pub rounds: Option<u32>,
    /// Golden update mode from ACCOUNTD_PROBE_UPDATE
    pub update: Option<bool>,
    /// Testdata directory from ACCOUNTD_PROBE_TESTDATA
    pub testdata: Option<String>,
    /// Config file from ACCOUNTD_PROBE_CONFIG
    pub config_file: Option<String>,
    /// Environment name from ACCOUNTD_PROBE_ENV
    pub environment: Option<String>,
    /// Output format from ACCOUNTD_PROBE_FORMAT
    pub format: Option<String>,
    /// Database image from ACCOUNTD_PROBE_DB_IMAGE
    pub db_image: Option<String>,
    /// Service image from ACCOUNTD_PROBE_SERVICE_IMAGE
    pub service_image: Option<String>,
    /// Verbose from ACCOUNTD_PROBE_VERBOSE
    pub verbose: Option<bool>,
    /// Docker host from DOCKER_HOST
    pub docker_host: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            host: get_env("HOST"),
            port: get_env_parse("PORT"),
            timeout: get_env_parse("TIMEOUT"),
            rounds: get_env_parse("ROUNDS"),
            update: get_env_bool("UPDATE"),
            testdata: get_env("TESTDATA"),
            config_file: get_env("CONFIG"),
            environment: get_env("ENV"),
            format: get_env("FORMAT"),
            db_image: get_env("DB_IMAGE"),
            service_image: get_env("SERVICE_IMAGE"),
            verbose: get_env_bool("VERBOSE"),
            docker_host: env::var("DOCKER_HOST").ok(),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.host.is_some()
            || self.port.is_some()
            || self.timeout.is_some()
            || self.rounds.is_some()
            || self.update.is_some()
            || self.testdata.is_some()
            || self.config_file.is_some()
            || self.environment.is_some()
            || self.format.is_some()
            || self.db_image.is_some()
            || self.service_image.is_some()
            || self.verbose.is_some()
    }

    /// Get host with fallback
    pub fn host_or(&self, default: &str) -> String {
        self.host.clone().unwrap_or_else(|| default.to_string())
    }

    /// Get port with fallback
    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }

    /// Get timeout with fallback
    pub fn timeout_or(&self, default: u64) -> u64 {
        self.timeout.unwrap_or(default)
    }

    /// Get rounds with fallback
    pub fn rounds_or(&self, default: u32) -> u32 {
        self.rounds.unwrap_or(default)
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_HOST:          {:?}", ENV_PREFIX, self.host);
        println!("  {}_PORT:          {:?}", ENV_PREFIX, self.port);
        println!("  {}_TIMEOUT:       {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_ROUNDS:        {:?}", ENV_PREFIX, self.rounds);
        println!("  {}_UPDATE:        {:?}", ENV_PREFIX, self.update);
        println!("  {}_TESTDATA:      {:?}", ENV_PREFIX, self.testdata);
        println!("  {}_CONFIG:        {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_ENV:           {:?}", ENV_PREFIX, self.environment);
        println!("  {}_FORMAT:        {:?}", ENV_PREFIX, self.format);
        println!("  {}_DB_IMAGE:      {:?}", ENV_PREFIX, self.db_image);
        println!("  {}_SERVICE_IMAGE: {:?}", ENV_PREFIX, self.service_image);
        println!("  DOCKER_HOST:            {:?}", self.docker_host);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set target host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_HOST"), host.into()));
        self
    }

    /// Set target port
    pub fn port(mut self, port: u16) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PORT"), port.to_string()));
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_TIMEOUT"), timeout.to_string()));
        self
    }

    /// Set rounds
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_ROUNDS"), rounds.to_string()));
        self
    }

    /// Set golden update mode
    pub fn update(mut self, update: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_UPDATE"), update.to_string()));
        self
    }

    /// Set testdata directory
    pub fn testdata(mut self, dir: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_TESTDATA"), dir.into()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all ACCOUNTD_PROBE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_HOST           Target host");
    println!("  {ENV_PREFIX}_PORT           Target port");
    println!("  {ENV_PREFIX}_TIMEOUT        Request timeout in seconds");
    println!("  {ENV_PREFIX}_ROUNDS         Number of test rounds");
    println!("  {ENV_PREFIX}_UPDATE         Regenerate golden files (true/false)");
    println!("  {ENV_PREFIX}_TESTDATA       Directory holding .golden files");
    println!("  {ENV_PREFIX}_CONFIG         Path to configuration file");
    println!("  {ENV_PREFIX}_ENV            Environment name (local, staging, ...)");
    println!("  {ENV_PREFIX}_FORMAT         Output format (table, json, csv)");
    println!("  {ENV_PREFIX}_DB_IMAGE       PostgreSQL image for the stack");
    println!("  {ENV_PREFIX}_SERVICE_IMAGE  accountd image for the stack");
    println!("  {ENV_PREFIX}_VERBOSE        Enable verbose output (true/false)");
    println!("  DOCKER_HOST              Docker daemon address");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_HOST=10.0.0.100");
    println!("  export {ENV_PREFIX}_UPDATE=true");
    println!("  accountd-probe test");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.host.is_none());
        assert!(config.update.is_none());
    }

    #[test]
    fn test_env_config_fallback() {
        let config = EnvConfig::default();
        assert_eq!(config.host_or("127.0.0.1"), "127.0.0.1");
        assert_eq!(config.port_or(8080), 8080);
        assert_eq!(config.timeout_or(30), 30);
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .host("10.0.0.1")
            .port(9090)
            .timeout(60)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.host, Some("10.0.0.1".to_string()));
        assert_eq!(config.port, Some(9090));
        assert_eq!(config.timeout, Some(60));
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().update(true).apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.update, Some(true));
    }

    #[test]
    fn test_has_any() {
        let empty = EnvConfig::default();
        assert!(!empty.has_any());

        let with_host = EnvConfig {
            host: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        assert!(with_host.has_any());
    }
}
