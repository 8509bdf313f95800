//! Compose manifest generation
//!
//! Renders the container stack as a docker-compose manifest so the same
//! environment can be run outside the harness.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::containers::StackConfig;

/// Top-level compose file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComposeFile {
    pub services: BTreeMap<String, ComposeService>,
    pub networks: BTreeMap<String, ComposeNetwork>,
}

/// One compose service entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComposeService {
    pub image: String,
    pub container_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<String>,
    pub networks: Vec<String>,
}

/// Compose network entry
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ComposeNetwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Generates compose manifests for a stack configuration
pub struct ComposeGenerator {
    config: StackConfig,
}

impl ComposeGenerator {
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    /// Build the compose file for the stack
    pub fn compose(&self) -> ComposeFile {
        let mut services = BTreeMap::new();

        services.insert(
            "db".to_string(),
            ComposeService {
                image: self.config.db_image.clone(),
                container_name: self.config.db_container.clone(),
                environment: vec![
                    format!("POSTGRES_USER={}", self.config.db_user),
                    format!("POSTGRES_PASSWORD={}", self.config.db_password),
                    format!("POSTGRES_DB={}", self.config.db_name),
                ],
                ports: vec![format!("{}:5432", self.config.db_port)],
                depends_on: Vec::new(),
                networks: vec!["probe".to_string()],
            },
        );

        services.insert(
            "accountd".to_string(),
            ComposeService {
                image: self.config.service_image.clone(),
                container_name: self.config.service_container.clone(),
                environment: vec![format!(
                    "DATABASE_URL={}",
                    self.config.service_database_url()
                )],
                ports: vec![format!("{}:8080", self.config.http_port)],
                depends_on: vec!["db".to_string()],
                networks: vec!["probe".to_string()],
            },
        );

        let mut networks = BTreeMap::new();
        networks.insert(
            "probe".to_string(),
            ComposeNetwork {
                name: Some(self.config.network.clone()),
            },
        );

        ComposeFile { services, networks }
    }

    /// Serialize to YAML
    pub fn to_yaml(manifest: &ComposeFile) -> String {
        serde_yaml::to_string(manifest).unwrap_or_default()
    }

    /// Serialize to JSON
    pub fn to_json(manifest: &ComposeFile) -> String {
        serde_json::to_string_pretty(manifest).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_has_both_services() {
        let generator = ComposeGenerator::new(StackConfig::default());
        let compose = generator.compose();

        assert!(compose.services.contains_key("db"));
        assert!(compose.services.contains_key("accountd"));
        assert_eq!(compose.networks.len(), 1);
    }

    #[test]
    fn test_service_depends_on_db() {
        let generator = ComposeGenerator::new(StackConfig::default());
        let compose = generator.compose();

        let svc = &compose.services["accountd"];
        assert_eq!(svc.depends_on, vec!["db"]);
        assert!(svc.environment[0].starts_with("DATABASE_URL="));
    }

    #[test]
    fn test_compose_yaml_roundtrip() {
        let generator = ComposeGenerator::new(StackConfig::default());
        let compose = generator.compose();

        let yaml = ComposeGenerator::to_yaml(&compose);
        assert!(yaml.contains("postgres:16-alpine"));

        let parsed: ComposeFile = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.services.len(), 2);
    }
}
