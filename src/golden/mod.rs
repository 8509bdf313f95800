//! Golden-file store
//!
//! Reference response bodies live under a testdata directory as
//! `<name>.golden` files. A run either compares fresh output against them
//! byte-for-byte or, in update mode, rewrites them from fresh output.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of comparing a response body against its golden file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GoldenCheck {
    /// Bytes are identical
    Match,
    /// Golden file exists but content differs
    Mismatch { diff: String },
    /// No golden file recorded yet
    Missing { path: PathBuf },
}

impl GoldenCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, GoldenCheck::Match)
    }
}

/// Store for golden reference files
#[derive(Clone, Debug)]
pub struct GoldenStore {
    dir: PathBuf,
}

impl GoldenStore {
    /// Create a store rooted at the given testdata directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the golden file for a test name
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.golden"))
    }

    /// Read a golden file
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read golden file: {}", path.display()))
    }

    /// Record fresh output as the new reference
    pub fn update(&self, name: &str, body: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create testdata dir: {}", self.dir.display()))?;

        let path = self.path(name);
        fs::write(&path, body)
            .with_context(|| format!("Failed to write golden file: {}", path.display()))?;

        info!("Updated golden file {}", path.display());
        Ok(path)
    }

    /// Compare fresh output against the recorded reference, byte-for-byte
    pub fn compare(&self, name: &str, actual: &str) -> GoldenCheck {
        let path = self.path(name);
        if !path.exists() {
            return GoldenCheck::Missing { path };
        }

        match self.read(name) {
            Ok(expected) if expected == actual => {
                debug!("Golden match for {name}");
                GoldenCheck::Match
            }
            Ok(expected) => GoldenCheck::Mismatch {
                diff: render_diff(&expected, actual),
            },
            Err(e) => GoldenCheck::Mismatch {
                diff: format!("could not read golden file: {e}"),
            },
        }
    }

    /// List recorded golden names (file stems), sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "golden").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Line-oriented mismatch report for display in failure messages
fn render_diff(expected: &str, actual: &str) -> String {
    let mut output = String::new();
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let max = expected_lines.len().max(actual_lines.len());

    for i in 0..max {
        let want = expected_lines.get(i).copied();
        let got = actual_lines.get(i).copied();

        if want == got {
            continue;
        }

        output.push_str(&format!("line {}:\n", i + 1));
        match want {
            Some(w) => output.push_str(&format!("  - {w}\n")),
            None => output.push_str("  - <end of golden file>\n"),
        }
        match got {
            Some(g) => output.push_str(&format!("  + {g}\n")),
            None => output.push_str("  + <end of response>\n"),
        }
    }

    if output.is_empty() {
        // Same lines, different bytes (e.g. trailing newline)
        output.push_str("bodies differ only in trailing whitespace or line endings\n");
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_golden_path() {
        let store = GoldenStore::new("testdata");
        assert_eq!(
            store.path("list_users"),
            PathBuf::from("testdata/list_users.golden")
        );
    }

    #[test]
    fn test_missing_golden() {
        let dir = tempdir().unwrap();
        let store = GoldenStore::new(dir.path());

        match store.compare("list_users", "[]") {
            GoldenCheck::Missing { path } => {
                assert!(path.ends_with("list_users.golden"));
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_update_then_match() {
        let dir = tempdir().unwrap();
        let store = GoldenStore::new(dir.path());

        store.update("get_user", r#"{"id":1}"#).unwrap();
        assert!(store.compare("get_user", r#"{"id":1}"#).is_match());
    }

    #[test]
    fn test_mismatch_reports_lines() {
        let dir = tempdir().unwrap();
        let store = GoldenStore::new(dir.path());

        store.update("get_user", r#"{"id":1,"name":"Alice Meyer"}"#).unwrap();
        match store.compare("get_user", r#"{"id":1,"name":"Alice M."}"#) {
            GoldenCheck::Mismatch { diff } => {
                assert!(diff.contains("line 1"));
                assert!(diff.contains("Alice Meyer"));
                assert!(diff.contains("Alice M."));
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_newline_is_a_mismatch() {
        let dir = tempdir().unwrap();
        let store = GoldenStore::new(dir.path());

        store.update("delete_user", "{\"deleted\":3}\n").unwrap();
        let check = store.compare("delete_user", "{\"deleted\":3}");
        assert!(!check.is_match());
    }

    #[test]
    fn test_list_golden_names() {
        let dir = tempdir().unwrap();
        let store = GoldenStore::new(dir.path());

        store.update("list_users", "[]").unwrap();
        store.update("get_user", "{}").unwrap();

        assert_eq!(store.list().unwrap(), vec!["get_user", "list_users"]);
    }
}
