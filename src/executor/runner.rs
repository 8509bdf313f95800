//! Test execution runner
//!
//! Runs the request table strictly sequentially: one case after another,
//! no concurrent requests, no shared mutable state between cases.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{error, info};

use crate::golden::GoldenStore;
use crate::http::HttpClient;
use crate::models::{SuiteConfig, TestCase, TestResult, TestRoundSummary};
use crate::suite;
use crate::utils::Timer;

/// Sequential runner for the accountd suite
pub struct SuiteRunner {
    config: SuiteConfig,
    client: HttpClient,
    store: GoldenStore,
}

impl SuiteRunner {
    /// Create a new suite runner
    pub fn new(config: SuiteConfig) -> Result<Self> {
        let client = HttpClient::with_timeout(config.timeout_secs)?
            .base_url(config.target.base_url());
        let store = GoldenStore::new(&config.testdata_dir);
        Ok(Self {
            config,
            client,
            store,
        })
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run a single test case
    pub async fn run_test(&self, test_case: TestCase) -> TestResult {
        // Check if test should be skipped
        if self.config.skip_tests.contains(&test_case.number()) {
            return TestResult::skip(test_case, "Skipped by configuration");
        }

        info!("Running {}", test_case);

        suite::run_test(
            &self.client,
            &self.store,
            test_case,
            self.config.update_golden,
        )
        .await
    }

    /// Run all test cases sequentially, in table order
    pub async fn run_all(&self) -> Result<TestRoundSummary> {
        info!("Starting test round against {}", self.config.target);

        let timer = Timer::start("test round");
        let mut results = Vec::new();

        for test_case in TestCase::all() {
            let result = self.run_test(test_case).await;
            info!("  {}", result);
            results.push(result);
        }

        let summary = TestRoundSummary::new(1, self.config.target.base_url(), results);

        info!(
            "Test round completed in {}ms - Pass: {}/{} ({:.1}%)",
            timer.elapsed_ms(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }

    /// Run multiple rounds of the full table
    pub async fn run_rounds(&self, num_rounds: u32) -> Result<Vec<TestRoundSummary>> {
        info!(
            "Running {} rounds against {}",
            num_rounds, self.config.target
        );

        let mut summaries = Vec::new();

        for round in 1..=num_rounds {
            info!("=== Round {}/{} ===", round, num_rounds);

            let mut results = Vec::new();

            for test_case in TestCase::all() {
                let result = self.run_test(test_case).await;
                results.push(result);
            }

            let summary = TestRoundSummary::new(round, self.config.target.base_url(), results);

            if !summary.is_all_passed() {
                error!(
                    "Round {} had failures: {} failed, {} errored",
                    round, summary.failed, summary.errors
                );
            }

            info!(
                "Round {} completed: {}/{} passed ({:.1}%)",
                round,
                summary.passed,
                summary.total,
                summary.pass_rate()
            );

            summaries.push(summary);
        }

        Ok(summaries)
    }

    /// Run a selected subset of cases
    pub async fn run_tests(&self, test_cases: &[TestCase]) -> Result<TestRoundSummary> {
        info!(
            "Running {} selected tests against {}",
            test_cases.len(),
            self.config.target
        );

        let mut results = Vec::new();

        for &test_case in test_cases {
            let result = self.run_test(test_case).await;
            info!("  {}", result);
            results.push(result);
        }

        Ok(TestRoundSummary::new(
            1,
            self.config.target.base_url(),
            results,
        ))
    }
}

/// Aggregate statistics across rounds
#[derive(Clone, Debug)]
pub struct AggregateResult {
    pub total_rounds: u32,
    pub overall_pass_rate: f64,
    pub test_pass_rates: HashMap<TestCase, f64>,
}

impl AggregateResult {
    /// Aggregate a set of round summaries
    pub fn from_summaries(summaries: &[TestRoundSummary]) -> Self {
        let total_rounds = summaries.len() as u32;

        let mut per_case: HashMap<TestCase, (u32, u32)> = HashMap::new();
        for summary in summaries {
            for result in &summary.results {
                let entry = per_case.entry(result.test_case).or_insert((0, 0));
                entry.1 += 1;
                if result.status.is_success() {
                    entry.0 += 1;
                }
            }
        }

        let test_pass_rates: HashMap<TestCase, f64> = per_case
            .into_iter()
            .map(|(case, (passed, total))| {
                (case, (passed as f64 / total.max(1) as f64) * 100.0)
            })
            .collect();

        let overall_pass_rate = if summaries.is_empty() {
            0.0
        } else {
            summaries.iter().map(|s| s.pass_rate()).sum::<f64>() / summaries.len() as f64
        };

        Self {
            total_rounds,
            overall_pass_rate,
            test_pass_rates,
        }
    }

    /// Cases that did not pass in every round
    pub fn flaky_tests(&self) -> Vec<(TestCase, f64)> {
        let mut flaky: Vec<_> = self
            .test_pass_rates
            .iter()
            .filter(|(_, rate)| **rate < 100.0)
            .map(|(case, rate)| (*case, *rate))
            .collect();
        flaky.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        flaky
    }
}

/// Quick runner for a single target
pub async fn quick_run(host: &str, port: u16) -> Result<TestRoundSummary> {
    use crate::models::TargetConfig;

    let config = SuiteConfig::new(TargetConfig::new(host, port));
    let runner = SuiteRunner::new(config)?;
    runner.run_all().await
}

/// Run a specific test by number
pub async fn run_test_by_number(host: &str, port: u16, test_number: u8) -> Result<TestResult> {
    use crate::models::TargetConfig;

    let test_case = TestCase::from_number(test_number)
        .context(format!("Invalid test number: {test_number}"))?;

    let config = SuiteConfig::new(TargetConfig::new(host, port));
    let runner = SuiteRunner::new(config)?;

    Ok(runner.run_test(test_case).await)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::models::{TargetConfig, TestStatus};

    #[test]
    fn test_runner_creation() {
        let config = SuiteConfig::new(TargetConfig::default());
        let runner = SuiteRunner::new(config);
        assert!(runner.is_ok());
    }

    #[tokio::test]
    async fn test_skip_list_is_honored() {
        let config = SuiteConfig::new(TargetConfig::default()).skip_test(1);
        let runner = SuiteRunner::new(config).unwrap();

        let result = runner.run_test(TestCase::ListUsers).await;
        assert_eq!(result.status, TestStatus::Skip);
    }

    #[test]
    fn test_aggregate_pass_rates() {
        let round = |pass: bool| {
            let result = if pass {
                TestResult::pass(TestCase::ListUsers, 5)
            } else {
                TestResult::fail(TestCase::ListUsers, 5, "body mismatch")
            };
            TestRoundSummary::new(1, "t", vec![result])
        };

        let aggregate = AggregateResult::from_summaries(&[round(true), round(false)]);
        assert_eq!(aggregate.total_rounds, 2);
        assert_eq!(aggregate.test_pass_rates[&TestCase::ListUsers], 50.0);
        assert_eq!(aggregate.flaky_tests().len(), 1);
    }

    #[test]
    fn test_aggregate_empty() {
        let aggregate = AggregateResult::from_summaries(&[]);
        assert_eq!(aggregate.total_rounds, 0);
        assert_eq!(aggregate.overall_pass_rate, 0.0);
    }
}
