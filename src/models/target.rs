//! Target service models
//!
//! Describes the accountd instance under test and the suite configuration.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Address of the accountd instance under test
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetConfig {
    pub host: String,
    pub port: u16,
    /// Readiness endpoint polled before and between runs
    pub health_path: String,
}

impl TargetConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            // The user list is the one endpoint the service is guaranteed
            // to serve, so readiness polls it by default.
            health_path: "/users".to_string(),
        }
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    /// Base URL for requests, without trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url(), self.health_path)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8080)
    }
}

impl fmt::Display for TargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url())
    }
}

/// Suite configuration for a test run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub target: TargetConfig,
    pub rounds: u32,
    pub timeout_secs: u64,
    pub skip_tests: Vec<u8>,
    /// Regenerate golden files instead of comparing against them
    pub update_golden: bool,
    /// Directory holding the `<name>.golden` reference files
    pub testdata_dir: PathBuf,
}

impl SuiteConfig {
    pub fn new(target: TargetConfig) -> Self {
        Self {
            target,
            rounds: 1,
            timeout_secs: 30,
            skip_tests: Vec::new(),
            update_golden: false,
            testdata_dir: PathBuf::from("testdata"),
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn update_golden(mut self, update: bool) -> Self {
        self.update_golden = update;
        self
    }

    pub fn with_testdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.testdata_dir = dir.into();
        self
    }

    pub fn skip_test(mut self, test_number: u8) -> Self {
        self.skip_tests.push(test_number);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_base_url() {
        let target = TargetConfig::new("10.0.0.5", 9000);
        assert_eq!(target.base_url(), "http://10.0.0.5:9000");
        assert_eq!(target.health_url(), "http://10.0.0.5:9000/users");
    }

    #[test]
    fn test_target_health_path_override() {
        let target = TargetConfig::default().with_health_path("/status");
        assert_eq!(target.health_url(), "http://127.0.0.1:8080/status");
    }

    #[test]
    fn test_suite_config_builder() {
        let config = SuiteConfig::new(TargetConfig::default())
            .with_rounds(3)
            .with_timeout(10)
            .update_golden(true)
            .skip_test(4);

        assert_eq!(config.rounds, 3);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.update_golden);
        assert_eq!(config.skip_tests, vec![4]);
    }
}
