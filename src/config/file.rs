//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::profile::{StackProfile, SuiteProfile};
use super::{AppConfig, StackDefaults};
use crate::models::TestCase;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./accountd-probe.yaml",
    "./accountd-probe.yml",
    "./.accountd-probe.yaml",
    "./.accountd-probe/config.yaml",
    "~/.config/accountd-probe/config.yaml",
    "~/.accountd-probe.yaml",
];

/// Full configuration file structure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Application settings
    #[serde(default)]
    pub app: AppConfig,

    /// Stack profiles
    #[serde(default)]
    pub stack_profiles: Vec<StackProfile>,

    /// Suite profiles
    #[serde(default)]
    pub suite_profiles: Vec<SuiteProfile>,

    /// Environment-specific overrides
    #[serde(default)]
    pub environments: Vec<EnvironmentConfig>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            stack_profiles: Vec::new(),
            suite_profiles: Vec::new(),
            environments: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Create a new config file with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        for location in CONFIG_LOCATIONS {
            let path = expand_path(location);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::find() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate version
        if !["1.0"].contains(&self.version.as_str()) {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }

        // Validate suite profiles
        let case_count = TestCase::all().len() as u8;
        for profile in &self.suite_profiles {
            for test_num in &profile.tests {
                if *test_num < 1 || *test_num > case_count {
                    anyhow::bail!(
                        "Invalid test number {} in profile '{}'. Valid range: 1-{}",
                        test_num,
                        profile.name,
                        case_count
                    );
                }
            }
        }

        Ok(())
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            version: "1.0".to_string(),
            app: AppConfig {
                default_host: "127.0.0.1".to_string(),
                default_port: 8080,
                default_rounds: 1,
                timeout_secs: 30,
                testdata_dir: "testdata".to_string(),
                stack: StackDefaults::default(),
            },
            stack_profiles: vec![StackProfile::postgres16(), StackProfile::postgres15()],
            suite_profiles: vec![
                SuiteProfile::smoke(),
                SuiteProfile::errors(),
                SuiteProfile::all(),
            ],
            environments: vec![
                EnvironmentConfig {
                    name: "local".to_string(),
                    host: "127.0.0.1".to_string(),
                    port: 8080,
                    extra: std::collections::HashMap::new(),
                },
                EnvironmentConfig {
                    name: "staging".to_string(),
                    host: "accountd.staging.internal".to_string(),
                    port: 80,
                    extra: std::collections::HashMap::new(),
                },
            ],
        }
    }

    /// Get environment by name
    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// Get stack profile by name
    pub fn stack_profile(&self, name: &str) -> Option<&StackProfile> {
        self.stack_profiles.iter().find(|p| p.name == name)
    }

    /// Get suite profile by name
    pub fn suite_profile(&self, name: &str) -> Option<&SuiteProfile> {
        self.suite_profiles.iter().find(|p| p.name == name)
    }
}

/// Environment-specific configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name (e.g., "local", "staging")
    pub name: String,
    /// Target host
    pub host: String,
    /// Target port
    pub port: u16,
    /// Extra environment-specific settings
    #[serde(default)]
    pub extra: std::collections::HashMap<String, String>,
}

impl EnvironmentConfig {
    /// Create new environment config
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            extra: std::collections::HashMap::new(),
        }
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_config_file_example() {
        let config = ConfigFile::example();
        assert!(!config.stack_profiles.is_empty());
        assert!(!config.suite_profiles.is_empty());
        assert!(!config.environments.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = ConfigFile::example();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.app.default_host, config.app.default_host);
    }

    #[test]
    fn test_environment_config() {
        let env = EnvironmentConfig::new("staging", "accountd.staging.internal", 80);
        assert_eq!(env.name, "staging");
        assert_eq!(env.port, 80);
    }

    #[test]
    fn test_validate_config() {
        let mut config = ConfigFile::default();
        config.suite_profiles.push(SuiteProfile {
            name: "invalid".to_string(),
            description: String::new(),
            tests: vec![99], // Invalid test number
            rounds: 1,
            timeout_secs: 30,
            tags: Vec::new(),
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
    }
}
