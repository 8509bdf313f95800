//! Thin wrapper around the docker CLI
//!
//! All container operations shell out to `docker` the same way the rest of
//! the tool shells out to external infrastructure. Stdout is returned
//! trimmed; stderr is folded into the error.

#![allow(dead_code)]

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Docker CLI errors
#[derive(Error, Debug)]
pub enum DockerError {
    #[error("docker binary not found or not executable: {0}")]
    NotAvailable(String),

    #[error("docker {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Runs docker subcommands
#[derive(Clone, Debug)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    /// Use an alternate binary (e.g. podman)
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run a docker subcommand, returning trimmed stdout
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        debug!("{} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| DockerError::NotAvailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DockerError::CommandFailed {
                command: args.first().copied().unwrap_or("").to_string(),
                stderr,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Check the daemon is reachable
    pub async fn available(&self) -> bool {
        self.run(&["version", "--format", "{{.Server.Version}}"])
            .await
            .is_ok()
    }

    /// Start a detached container, returning its id
    pub async fn run_detached(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["run", "-d"];
        full.extend_from_slice(args);
        self.run(&full).await.context("Failed to start container")
    }

    /// Execute a command inside a running container
    pub async fn exec(&self, container: &str, cmd: &[&str]) -> Result<String> {
        let mut full = vec!["exec", container];
        full.extend_from_slice(cmd);
        self.run(&full).await
    }

    /// Force-remove a container; missing containers are not an error
    pub async fn remove_force(&self, container: &str) -> Result<()> {
        match self.run(&["rm", "-f", container]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("No such container") {
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Container state (e.g. "running", "exited"), or None if absent
    pub async fn state(&self, container: &str) -> Option<String> {
        self.run(&["inspect", "--format", "{{.State.Status}}", container])
            .await
            .ok()
    }

    /// Check an image is present locally
    pub async fn image_present(&self, image: &str) -> bool {
        self.run(&["image", "inspect", "--format", "{{.Id}}", image])
            .await
            .is_ok()
    }

    /// Create a network; an existing one is not an error
    pub async fn network_create(&self, name: &str) -> Result<()> {
        match self.run(&["network", "create", name]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("already exists") {
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Remove a network; a missing one is not an error
    pub async fn network_remove(&self, name: &str) -> Result<()> {
        match self.run(&["network", "rm", name]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("not found") {
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Tail of a container's logs, for failure diagnostics
    pub async fn logs_tail(&self, container: &str, lines: u32) -> Result<String> {
        let lines = lines.to_string();
        self.run(&["logs", "--tail", &lines, container]).await
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docker_error_display() {
        let err = DockerError::CommandFailed {
            command: "run".to_string(),
            stderr: "port is already allocated".to_string(),
        };
        assert!(err.to_string().contains("docker run failed"));
        assert!(err.to_string().contains("port is already allocated"));
    }

    #[test]
    fn test_custom_binary() {
        let cli = DockerCli::with_binary("podman");
        assert_eq!(cli.binary, "podman");
    }
}
