//! Health checking for the container stack
//!
//! Provides readiness and health verification for the database and the
//! service under test.

#![allow(dead_code)]

use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use super::containers::StackConfig;
use super::docker::DockerCli;
use crate::http::HttpClient;
use crate::models::TargetConfig;

/// Health check configuration
#[derive(Clone, Debug)]
pub struct HealthCheckConfig {
    /// Timeout for individual HTTP checks
    pub check_timeout_secs: u64,

    /// Bounded number of polling attempts
    pub attempts: u32,

    /// Fixed sleep between attempts
    pub interval_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            check_timeout_secs: 5,
            attempts: 30,
            interval_secs: 2,
        }
    }
}

impl HealthCheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_timeout(mut self, secs: u64) -> Self {
        self.check_timeout_secs = secs;
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn interval(mut self, secs: u64) -> Self {
        self.interval_secs = secs;
        self
    }
}

/// Health checker for the stack and the service endpoint
pub struct HealthChecker {
    config: HealthCheckConfig,
    docker: DockerCli,
    http_client: HttpClient,
}

impl HealthChecker {
    /// Create a new health checker
    pub fn new(config: HealthCheckConfig) -> Result<Self> {
        let http_client = HttpClient::with_timeout(config.check_timeout_secs)?;
        Ok(Self {
            config,
            docker: DockerCli::new(),
            http_client,
        })
    }

    /// Check overall stack health
    pub async fn check_stack(&self, stack: &StackConfig, target: &TargetConfig) -> HealthStatus {
        info!("Checking health of stack at {}", target.base_url());

        let mut checks = Vec::new();

        checks.push(self.check_container(&stack.db_container).await);
        checks.push(self.check_db_connections(stack).await);
        checks.push(self.check_container(&stack.service_container).await);
        checks.push(self.check_http(target).await);

        let passed = checks.iter().filter(|c| c.passed).count();
        let total = checks.len();

        HealthStatus {
            healthy: passed == total,
            checks,
            message: if passed == total {
                "All health checks passed".to_string()
            } else {
                format!("{passed}/{total} checks passed")
            },
        }
    }

    /// Check a container is running
    async fn check_container(&self, container: &str) -> HealthCheck {
        match self.docker.state(container).await {
            Some(state) if state == "running" => {
                HealthCheck::pass(container, "container is running")
            }
            Some(state) => HealthCheck::fail(container, format!("container state: {state}")),
            None => HealthCheck::fail(container, "container not found"),
        }
    }

    /// Check the database accepts connections
    async fn check_db_connections(&self, stack: &StackConfig) -> HealthCheck {
        let name = "Database";

        let result = self
            .docker
            .exec(
                &stack.db_container,
                &["pg_isready", "-U", &stack.db_user, "-d", &stack.db_name],
            )
            .await;

        match result {
            Ok(out) if out.contains("accepting connections") => {
                HealthCheck::pass(name, "accepting connections")
            }
            Ok(out) => HealthCheck::fail(name, out),
            Err(e) => HealthCheck::fail(name, format!("pg_isready error: {e}")),
        }
    }

    /// Check HTTP connectivity to the service health endpoint
    async fn check_http(&self, target: &TargetConfig) -> HealthCheck {
        let name = "HTTP";
        let url = target.health_url();

        debug!("Checking HTTP connectivity to {}", url);

        match self.http_client.get(&url).await {
            Ok(response) if response.is_success() => HealthCheck::pass(
                name,
                format!("healthy (status: {})", response.status_code),
            ),
            Ok(response) => HealthCheck::fail(
                name,
                format!("unexpected status: {}", response.status_code),
            ),
            Err(e) => HealthCheck::fail(name, format!("cannot connect: {e}")),
        }
    }

    /// Wait for the stack to become healthy.
    ///
    /// A bounded loop: `attempts` polls with a fixed sleep in between.
    pub async fn wait_ready(
        &self,
        stack: &StackConfig,
        target: &TargetConfig,
    ) -> Result<HealthStatus> {
        info!(
            "Waiting for stack readiness (up to {} attempts, {}s apart)",
            self.config.attempts, self.config.interval_secs
        );

        let mut status = HealthStatus {
            healthy: false,
            checks: Vec::new(),
            message: "no attempts made".to_string(),
        };

        for attempt in 1..=self.config.attempts {
            status = self.check_stack(stack, target).await;

            if status.healthy {
                info!("Stack is healthy after {attempt} attempts");
                return Ok(status);
            }

            debug!(
                "Readiness attempt {}/{}: {}",
                attempt, self.config.attempts, status.message
            );
            sleep(Duration::from_secs(self.config.interval_secs)).await;
        }

        status.message = format!(
            "stack not ready after {} attempts: {}",
            self.config.attempts, status.message
        );
        Ok(status)
    }

    /// Quick connectivity check against the service
    pub async fn ping(&self, target: &TargetConfig) -> bool {
        self.http_client.get(&target.health_url()).await.is_ok()
    }
}

/// Health status of the stack
#[derive(Clone, Debug)]
pub struct HealthStatus {
    /// Overall health status
    pub healthy: bool,

    /// Individual health checks
    pub checks: Vec<HealthCheck>,

    /// Status message
    pub message: String,
}

impl HealthStatus {
    /// Format as table
    pub fn format_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\n┌─────────────────────────────────────────────────────────────┐\n");
        output.push_str(&format!(
            "│ Stack Health: {:45} │\n",
            if self.healthy {
                "✓ Healthy"
            } else {
                "✗ Unhealthy"
            }
        ));
        output.push_str("├─────────────────────────────────────────────────────────────┤\n");

        for check in &self.checks {
            let status = if check.passed { "✓" } else { "✗" };
            output.push_str(&format!(
                "│ {} {:20} {:35} │\n",
                status,
                check.name,
                truncate(&check.message, 35)
            ));
        }

        output.push_str("└─────────────────────────────────────────────────────────────┘\n");

        output
    }
}

/// Individual health check result
#[derive(Clone, Debug)]
pub struct HealthCheck {
    /// Check name
    pub name: String,

    /// Whether check passed
    pub passed: bool,

    /// Result message
    pub message: String,
}

impl HealthCheck {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

/// Pre-flight checks before any container is started
pub struct PreFlightChecker {
    docker: DockerCli,
}

impl PreFlightChecker {
    pub fn new() -> Self {
        Self {
            docker: DockerCli::new(),
        }
    }

    /// Run all pre-flight checks
    pub async fn run(&self, stack: &StackConfig) -> PreFlightResult {
        info!("Running pre-flight checks");

        let mut checks = Vec::new();

        checks.push(self.check_docker().await);
        checks.push(self.check_image(&stack.db_image).await);
        checks.push(self.check_image(&stack.service_image).await);
        checks.push(self.check_leftovers(stack).await);

        let passed = checks.iter().filter(|c| c.passed).count();
        let total = checks.len();

        PreFlightResult {
            passed: passed == total,
            checks,
            message: if passed == total {
                "All pre-flight checks passed. Ready to start the stack.".to_string()
            } else {
                format!("{passed}/{total} checks passed. Some issues found.")
            },
        }
    }

    async fn check_docker(&self) -> HealthCheck {
        if self.docker.available().await {
            HealthCheck::pass("docker", "docker daemon is reachable")
        } else {
            HealthCheck::fail("docker", "docker not found or daemon not running")
        }
    }

    async fn check_image(&self, image: &str) -> HealthCheck {
        if self.docker.image_present(image).await {
            HealthCheck::pass(image, "image present locally")
        } else {
            HealthCheck::fail(image, "image not present locally (pull it first)")
        }
    }

    /// Stale containers from an interrupted run block a fresh start
    async fn check_leftovers(&self, stack: &StackConfig) -> HealthCheck {
        let name = "Leftovers";

        for container in [&stack.db_container, &stack.service_container] {
            if self.docker.state(container).await.is_some() {
                return HealthCheck::fail(
                    name,
                    format!("container {container} already exists (run stack down)"),
                );
            }
        }

        HealthCheck::pass(name, "no leftover containers")
    }
}

impl Default for PreFlightChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-flight check result
#[derive(Clone, Debug)]
pub struct PreFlightResult {
    /// Whether all checks passed
    pub passed: bool,

    /// Individual checks
    pub checks: Vec<HealthCheck>,

    /// Result message
    pub message: String,
}

impl PreFlightResult {
    /// Format as table
    pub fn format_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\n┌─────────────────────────────────────────────────────────────┐\n");
        output.push_str("│ Pre-Flight Checks                                           │\n");
        output.push_str("├─────────────────────────────────────────────────────────────┤\n");

        for check in &self.checks {
            let status = if check.passed { "✓" } else { "✗" };
            output.push_str(&format!(
                "│ {} {:20} {:35} │\n",
                status,
                check.name,
                truncate(&check.message, 35)
            ));
        }

        output.push_str("├─────────────────────────────────────────────────────────────┤\n");
        output.push_str(&format!(
            "│ Result: {}                                              │\n",
            if self.passed { "READY" } else { "BLOCKED" }
        ));
        output.push_str("└─────────────────────────────────────────────────────────────┘\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_config() {
        let config = HealthCheckConfig::new()
            .check_timeout(15)
            .attempts(10)
            .interval(3);

        assert_eq!(config.check_timeout_secs, 15);
        assert_eq!(config.attempts, 10);
        assert_eq!(config.interval_secs, 3);
    }

    #[test]
    fn test_health_check() {
        let pass = HealthCheck::pass("test", "passed");
        assert!(pass.passed);

        let fail = HealthCheck::fail("test", "failed");
        assert!(!fail.passed);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is long", 10), "this is...");
    }

    #[test]
    fn test_health_status_table() {
        let status = HealthStatus {
            healthy: false,
            checks: vec![
                HealthCheck::pass("Database", "accepting connections"),
                HealthCheck::fail("HTTP", "cannot connect"),
            ],
            message: "1/2 checks passed".to_string(),
        };

        let table = status.format_table();
        assert!(table.contains("✗ Unhealthy"));
        assert!(table.contains("accepting connections"));
    }
}
