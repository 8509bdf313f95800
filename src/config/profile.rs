//! Stack and suite profiles
//!
//! Named presets for the container stack and for case subsets.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::models::TestCase;
use crate::stack::StackConfig;

/// A named container-stack preset
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StackProfile {
    /// Profile name
    pub name: String,

    /// PostgreSQL image
    pub db_image: String,

    /// accountd image
    pub service_image: String,

    /// Host port mapped to the database
    pub db_port: u16,

    /// Host port mapped to the service
    pub http_port: u16,
}

impl StackProfile {
    /// Default stack against PostgreSQL 16
    pub fn postgres16() -> Self {
        Self {
            name: "postgres-16".to_string(),
            db_image: "postgres:16-alpine".to_string(),
            service_image: "accountd:latest".to_string(),
            db_port: 54329,
            http_port: 8080,
        }
    }

    /// Compatibility stack against PostgreSQL 15
    pub fn postgres15() -> Self {
        Self {
            name: "postgres-15".to_string(),
            db_image: "postgres:15-alpine".to_string(),
            service_image: "accountd:latest".to_string(),
            db_port: 54329,
            http_port: 8080,
        }
    }

    /// All predefined stack profiles
    pub fn predefined() -> Vec<StackProfile> {
        vec![Self::postgres16(), Self::postgres15()]
    }

    /// Find a predefined profile by name
    pub fn find(name: &str) -> Option<StackProfile> {
        Self::predefined().into_iter().find(|p| p.name == name)
    }

    /// Convert into a stack configuration
    pub fn to_stack_config(&self) -> StackConfig {
        StackConfig::new()
            .db_image(&self.db_image)
            .service_image(&self.service_image)
            .db_port(self.db_port)
            .http_port(self.http_port)
    }
}

/// A named subset of the case table
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteProfile {
    /// Profile name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Test numbers included in the profile
    pub tests: Vec<u8>,

    /// Default rounds for this profile
    pub rounds: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Free-form tags
    pub tags: Vec<String>,
}

impl SuiteProfile {
    /// Quick read-only smoke check
    pub fn smoke() -> Self {
        Self {
            name: "smoke".to_string(),
            description: "Read-only smoke check against seed data".to_string(),
            tests: vec![1, 2],
            rounds: 1,
            timeout_secs: 10,
            tags: vec!["fast".to_string(), "read-only".to_string()],
        }
    }

    /// Error-path coverage only
    pub fn errors() -> Self {
        Self {
            name: "errors".to_string(),
            description: "Missing-resource and validation error paths".to_string(),
            tests: vec![3, 5, 7, 9],
            rounds: 1,
            timeout_secs: 10,
            tags: vec!["errors".to_string()],
        }
    }

    /// The full table
    pub fn all() -> Self {
        Self {
            name: "all".to_string(),
            description: "Every case in the table".to_string(),
            tests: TestCase::all().iter().map(|c| c.number()).collect(),
            rounds: 1,
            timeout_secs: 30,
            tags: vec!["full".to_string()],
        }
    }

    /// All predefined suite profiles
    pub fn predefined() -> Vec<SuiteProfile> {
        vec![Self::smoke(), Self::errors(), Self::all()]
    }

    /// Find a predefined profile by name
    pub fn find(name: &str) -> Option<SuiteProfile> {
        Self::predefined().into_iter().find(|p| p.name == name)
    }

    /// Resolve the profile's test numbers into cases
    pub fn cases(&self) -> Vec<TestCase> {
        self.tests
            .iter()
            .filter_map(|n| TestCase::from_number(*n))
            .collect()
    }
}

/// Lookup over predefined and configured profiles
pub struct ProfileManager {
    stack_profiles: Vec<StackProfile>,
    suite_profiles: Vec<SuiteProfile>,
}

impl ProfileManager {
    pub fn new() -> Self {
        Self {
            stack_profiles: StackProfile::predefined(),
            suite_profiles: SuiteProfile::predefined(),
        }
    }

    /// Add profiles from a loaded config file
    pub fn with_config_profiles(
        mut self,
        stack: Vec<StackProfile>,
        suite: Vec<SuiteProfile>,
    ) -> Self {
        for profile in stack {
            if !self.stack_profiles.iter().any(|p| p.name == profile.name) {
                self.stack_profiles.push(profile);
            }
        }
        for profile in suite {
            if !self.suite_profiles.iter().any(|p| p.name == profile.name) {
                self.suite_profiles.push(profile);
            }
        }
        self
    }

    pub fn list_stack_profiles(&self) -> &[StackProfile] {
        &self.stack_profiles
    }

    pub fn list_suite_profiles(&self) -> &[SuiteProfile] {
        &self.suite_profiles
    }

    pub fn stack_profile(&self, name: &str) -> Option<&StackProfile> {
        self.stack_profiles.iter().find(|p| p.name == name)
    }

    pub fn suite_profile(&self, name: &str) -> Option<&SuiteProfile> {
        self.suite_profiles.iter().find(|p| p.name == name)
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_profile_to_config() {
        let config = StackProfile::postgres15().to_stack_config();
        assert_eq!(config.db_image, "postgres:15-alpine");
    }

    #[test]
    fn test_suite_profile_all_covers_table() {
        let profile = SuiteProfile::all();
        assert_eq!(profile.cases().len(), TestCase::all().len());
    }

    #[test]
    fn test_suite_profile_errors_only_error_cases() {
        for case in SuiteProfile::errors().cases() {
            assert!(case.name().contains("Missing") || case.name().contains("Invalid"));
        }
    }

    #[test]
    fn test_profile_manager_lookup() {
        let manager = ProfileManager::new();
        assert!(manager.suite_profile("smoke").is_some());
        assert!(manager.stack_profile("postgres-16").is_some());
        assert!(manager.suite_profile("nope").is_none());
    }

    #[test]
    fn test_profile_manager_merges_config_profiles() {
        let extra = SuiteProfile {
            name: "writes".to_string(),
            description: "mutating cases".to_string(),
            tests: vec![4, 6, 8],
            rounds: 1,
            timeout_secs: 30,
            tags: Vec::new(),
        };

        let manager = ProfileManager::new().with_config_profiles(Vec::new(), vec![extra]);
        assert!(manager.suite_profile("writes").is_some());
        // Predefined profiles win on name collisions
        assert_eq!(manager.suite_profile("smoke").unwrap().tests, vec![1, 2]);
    }
}
