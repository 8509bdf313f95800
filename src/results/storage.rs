//! Results storage and retrieval
//!
//! Provides persistent storage for test runs in JSON format, one directory
//! per target.

#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{TestResult, TestRoundSummary, TestStatus};

/// Stored test run containing all results
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTestRun {
    /// Unique run ID
    pub id: String,

    /// Target base URL
    pub target: String,

    /// Timestamp when test started
    pub started_at: DateTime<Utc>,

    /// Timestamp when test completed
    pub completed_at: DateTime<Utc>,

    /// Number of rounds
    pub rounds: u32,

    /// Whether this run regenerated golden files
    pub updated_golden: bool,

    /// Round summaries
    pub summaries: Vec<StoredRoundSummary>,

    /// Aggregate statistics
    pub aggregate: Option<AggregateStats>,

    /// Test configuration
    pub config: TestRunConfig,

    /// Environment info
    pub environment: EnvironmentInfo,
}

/// Stored round summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRoundSummary {
    /// Round number
    pub round: u32,

    /// Total tests run
    pub total: usize,

    /// Tests passed
    pub passed: usize,

    /// Tests failed
    pub failed: usize,

    /// Tests skipped
    pub skipped: usize,

    /// Pass rate (0.0 - 1.0)
    pub pass_rate: f64,

    /// Total duration in milliseconds
    pub duration_ms: u64,

    /// Individual test results
    pub results: Vec<StoredTestResult>,
}

/// Stored test result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTestResult {
    /// Test case number
    pub test_number: u8,

    /// Test name
    pub test_name: String,

    /// Test category
    pub category: String,

    /// Golden file stem
    pub golden: String,

    /// Whether test passed
    pub passed: bool,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// HTTP status code (if a response was received)
    pub status_code: Option<u16>,

    /// Error message (if failed)
    pub error: Option<String>,
}

/// Aggregate statistics across all rounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Average pass rate
    pub avg_pass_rate: f64,

    /// Minimum pass rate
    pub min_pass_rate: f64,

    /// Maximum pass rate
    pub max_pass_rate: f64,

    /// Average duration per round
    pub avg_duration_ms: u64,

    /// Total duration
    pub total_duration_ms: u64,

    /// Per-test statistics
    pub test_stats: BTreeMap<String, TestStats>,
}

/// Statistics for a single test across rounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestStats {
    /// Number of times passed
    pub pass_count: u32,

    /// Number of times failed
    pub fail_count: u32,

    /// Pass rate
    pub pass_rate: f64,

    /// Average duration
    pub avg_duration_ms: u64,

    /// Min duration
    pub min_duration_ms: u64,

    /// Max duration
    pub max_duration_ms: u64,
}

/// Test run configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRunConfig {
    /// Target host
    pub host: String,

    /// Target port
    pub port: u16,

    /// Timeout in seconds
    pub timeout_secs: u64,

    /// Testdata directory used for golden files
    pub testdata_dir: String,

    /// Skipped test numbers
    pub skipped_tests: Vec<u8>,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Operating system
    pub os: String,

    /// Architecture
    pub arch: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for TestRunConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            timeout_secs: 30,
            testdata_dir: "testdata".to_string(),
            skipped_tests: Vec::new(),
        }
    }
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredTestRun {
    /// Create a new stored test run
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            id: generate_run_id(),
            target: target.into(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            rounds: 0,
            updated_golden: false,
            summaries: Vec::new(),
            aggregate: None,
            config: TestRunConfig::default(),
            environment: EnvironmentInfo::default(),
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: TestRunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_updated_golden(mut self, updated: bool) -> Self {
        self.updated_golden = updated;
        self
    }

    /// Add a round summary
    pub fn add_round(&mut self, round: u32, summary: &TestRoundSummary) {
        let stored = StoredRoundSummary::from_round_summary(round, summary);
        self.summaries.push(stored);
        self.rounds = round;
        self.completed_at = Utc::now();
    }

    /// Calculate aggregate statistics
    pub fn calculate_aggregate(&mut self) {
        if self.summaries.is_empty() {
            return;
        }

        let mut pass_rates: Vec<f64> = Vec::new();
        let mut durations: Vec<u64> = Vec::new();
        let mut test_results: BTreeMap<String, Vec<(bool, u64)>> = BTreeMap::new();

        for summary in &self.summaries {
            pass_rates.push(summary.pass_rate);
            durations.push(summary.duration_ms);

            for result in &summary.results {
                test_results
                    .entry(result.test_name.clone())
                    .or_default()
                    .push((result.passed, result.duration_ms));
            }
        }

        let avg_pass_rate = pass_rates.iter().sum::<f64>() / pass_rates.len() as f64;
        let min_pass_rate = pass_rates.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_pass_rate = pass_rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let total_duration_ms: u64 = durations.iter().sum();
        let avg_duration_ms = total_duration_ms / durations.len() as u64;

        let mut test_stats: BTreeMap<String, TestStats> = BTreeMap::new();
        for (name, results) in test_results {
            let pass_count = results.iter().filter(|(p, _)| *p).count() as u32;
            let fail_count = results.len() as u32 - pass_count;
            let pass_rate = pass_count as f64 / results.len() as f64;

            let durs: Vec<u64> = results.iter().map(|(_, d)| *d).collect();
            let avg_dur = durs.iter().sum::<u64>() / durs.len() as u64;
            let min_dur = *durs.iter().min().unwrap_or(&0);
            let max_dur = *durs.iter().max().unwrap_or(&0);

            test_stats.insert(
                name,
                TestStats {
                    pass_count,
                    fail_count,
                    pass_rate,
                    avg_duration_ms: avg_dur,
                    min_duration_ms: min_dur,
                    max_duration_ms: max_dur,
                },
            );
        }

        self.aggregate = Some(AggregateStats {
            avg_pass_rate,
            min_pass_rate,
            max_pass_rate,
            avg_duration_ms,
            total_duration_ms,
            test_stats,
        });
    }
}

impl StoredRoundSummary {
    /// Convert from TestRoundSummary
    pub fn from_round_summary(round: u32, summary: &TestRoundSummary) -> Self {
        let results: Vec<StoredTestResult> = summary
            .results
            .iter()
            .map(StoredTestResult::from_test_result)
            .collect();

        let pass_rate = if summary.total > 0 {
            summary.passed as f64 / summary.total as f64
        } else {
            0.0
        };

        Self {
            round,
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            skipped: summary.skipped,
            pass_rate,
            duration_ms: summary.total_duration_ms,
            results,
        }
    }
}

impl StoredTestResult {
    /// Convert from TestResult
    pub fn from_test_result(result: &TestResult) -> Self {
        Self {
            test_number: result.test_case.number(),
            test_name: result.test_case.name().to_string(),
            category: result.test_case.category().to_string(),
            golden: result.test_case.golden_name().to_string(),
            passed: result.status == TestStatus::Pass,
            duration_ms: result.duration_ms,
            status_code: result.status_code,
            error: if result.status == TestStatus::Pass {
                None
            } else {
                result.message.clone()
            },
        }
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Directory-safe slug for a target base URL
fn target_slug(target: &str) -> String {
    target
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .replace([':', '/', '.'], "_")
}

/// Results storage manager
pub struct ResultsStorage {
    /// Base directory for results
    base_dir: PathBuf,
}

impl ResultsStorage {
    /// Create a new results storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create with default directory
    pub fn default_dir() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("accountd-probe")
            .join("results");
        Ok(Self::new(base_dir))
    }

    /// Get path for a target's results
    fn target_dir(&self, target: &str) -> PathBuf {
        self.base_dir.join(target_slug(target))
    }

    /// Get path for a specific run
    fn run_path(&self, target: &str, run_id: &str) -> PathBuf {
        self.target_dir(target).join(format!("{run_id}.json"))
    }

    /// Save a test run
    pub fn save(&self, run: &StoredTestRun) -> Result<PathBuf> {
        let target_dir = self.target_dir(&run.target);
        fs::create_dir_all(&target_dir)?;

        let path = self.run_path(&run.target, &run.id);
        let file = File::create(&path).context("Failed to create results file")?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, run).context("Failed to write results")?;

        info!("Saved test results to {}", path.display());
        Ok(path)
    }

    /// Load a test run
    pub fn load(&self, target: &str, run_id: &str) -> Result<StoredTestRun> {
        let path = self.run_path(target, run_id);
        self.load_from_path(&path)
    }

    /// Load all runs for a target, newest first
    pub fn load_target(&self, target: &str) -> Result<Vec<StoredTestRun>> {
        let target_dir = self.target_dir(target);
        if !target_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&target_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.load_from_path(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => {
                        debug!("Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    /// Load from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<StoredTestRun> {
        let file = File::open(path).context("Failed to open results file")?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context("Failed to parse results")
    }

    /// List all targets with results
    pub fn list_targets(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut targets = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    targets.push(name.to_string());
                }
            }
        }

        targets.sort();
        Ok(targets)
    }

    /// List all runs for a target
    pub fn list_runs(&self, target: &str) -> Result<Vec<RunInfo>> {
        let runs = self.load_target(target)?;
        Ok(runs
            .into_iter()
            .map(|run| RunInfo {
                pass_rate: run
                    .aggregate
                    .as_ref()
                    .map(|a| a.avg_pass_rate)
                    .unwrap_or(0.0),
                id: run.id,
                target: run.target,
                started_at: run.started_at,
                rounds: run.rounds,
            })
            .collect())
    }

    /// Get latest run for a target
    pub fn latest(&self, target: &str) -> Result<Option<StoredTestRun>> {
        let runs = self.load_target(target)?;
        Ok(runs.into_iter().next())
    }

    /// Delete a run
    pub fn delete(&self, target: &str, run_id: &str) -> Result<()> {
        let path = self.run_path(target, run_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted results: {}", path.display());
        }
        Ok(())
    }

    /// Export run to a file
    pub fn export(&self, run: &StoredTestRun, path: &Path, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Json => {
                let file = File::create(path)?;
                let writer = BufWriter::new(file);
                serde_json::to_writer_pretty(writer, run)?;
            }
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;

                // Write header
                writer.write_record([
                    "round",
                    "test_number",
                    "test_name",
                    "category",
                    "golden",
                    "passed",
                    "duration_ms",
                    "status_code",
                    "error",
                ])?;

                // Write results
                for summary in &run.summaries {
                    for result in &summary.results {
                        writer.write_record([
                            summary.round.to_string(),
                            result.test_number.to_string(),
                            result.test_name.clone(),
                            result.category.clone(),
                            result.golden.clone(),
                            result.passed.to_string(),
                            result.duration_ms.to_string(),
                            result
                                .status_code
                                .map(|s| s.to_string())
                                .unwrap_or_default(),
                            result.error.clone().unwrap_or_default(),
                        ])?;
                    }
                }
                writer.flush()?;
            }
        }

        info!("Exported results to {}", path.display());
        Ok(())
    }
}

/// Brief run information
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub id: String,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub rounds: u32,
    pub pass_rate: f64,
}

/// Export format
#[derive(Clone, Copy, Debug)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TestCase, TestResult};
    use tempfile::tempdir;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        assert!(!id1.is_empty());
    }

    #[test]
    fn test_target_slug() {
        assert_eq!(target_slug("http://127.0.0.1:8080"), "127_0_0_1_8080");
        assert_eq!(target_slug("accountd.internal:80"), "accountd_internal_80");
    }

    #[test]
    fn test_stored_test_run() {
        let run = StoredTestRun::new("http://127.0.0.1:8080");
        assert_eq!(run.target, "http://127.0.0.1:8080");
        assert_eq!(run.rounds, 0);
        assert!(!run.updated_golden);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path());

        let mut run = StoredTestRun::new("http://127.0.0.1:8080");
        let summary = TestRoundSummary::new(
            1,
            "http://127.0.0.1:8080",
            vec![
                TestResult::pass(TestCase::ListUsers, 12),
                TestResult::fail(TestCase::GetUser, 9, "body mismatch"),
            ],
        );
        run.add_round(1, &summary);
        run.calculate_aggregate();

        storage.save(&run).unwrap();

        let loaded = storage.latest("http://127.0.0.1:8080").unwrap().unwrap();
        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.summaries.len(), 1);
        assert_eq!(loaded.summaries[0].results.len(), 2);
        assert!(loaded.aggregate.is_some());
    }

    #[test]
    fn test_aggregate_stats() {
        let mut run = StoredTestRun::new("t");
        for round in 1..=2 {
            let summary = TestRoundSummary::new(
                round,
                "t",
                vec![TestResult::pass(TestCase::ListUsers, 10)],
            );
            run.add_round(round, &summary);
        }
        run.calculate_aggregate();

        let agg = run.aggregate.unwrap();
        assert_eq!(agg.avg_pass_rate, 1.0);
        assert_eq!(agg.test_stats["List Users"].pass_count, 2);
    }

    #[test]
    fn test_export_format() {
        assert!(matches!(
            ExportFormat::from_str("json"),
            Some(ExportFormat::Json)
        ));
        assert!(matches!(
            ExportFormat::from_str("csv"),
            Some(ExportFormat::Csv)
        ));
        assert!(ExportFormat::from_str("unknown").is_none());
    }

    #[test]
    fn test_environment_info() {
        let env = EnvironmentInfo::default();
        assert!(!env.os.is_empty());
        assert!(!env.arch.is_empty());
        assert_eq!(env.tool_version, env!("CARGO_PKG_VERSION"));
    }
}
