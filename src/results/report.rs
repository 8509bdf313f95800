//! Report generation for stored runs
//!
//! Renders a stored run as Markdown or plain text for export.

#![allow(dead_code)]

use super::storage::{ResultsStorage, StoredTestRun};

/// Report output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Some(ReportFormat::Markdown),
            "txt" | "text" => Some(ReportFormat::Text),
            _ => None,
        }
    }
}

/// Generates human-readable reports from stored runs
pub struct ReportGenerator {
    storage: ResultsStorage,
}

impl ReportGenerator {
    pub fn new(storage: ResultsStorage) -> Self {
        Self { storage }
    }

    /// Report for a single stored run
    pub fn run_report(&self, run: &StoredTestRun, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.run_report_markdown(run),
            ReportFormat::Text => self.run_report_text(run),
        }
    }

    fn run_report_markdown(&self, run: &StoredTestRun) -> String {
        let mut out = String::new();

        out.push_str(&format!("# accountd test run {}\n\n", run.id));
        out.push_str(&format!("- Target: `{}`\n", run.target));
        out.push_str(&format!("- Started: {}\n", run.started_at.to_rfc3339()));
        out.push_str(&format!("- Rounds: {}\n", run.rounds));
        out.push_str(&format!(
            "- Tool: accountd-probe v{} ({}/{})\n",
            run.environment.tool_version, run.environment.os, run.environment.arch
        ));
        if run.updated_golden {
            out.push_str("- Golden files were regenerated during this run\n");
        }
        out.push('\n');

        if let Some(agg) = &run.aggregate {
            out.push_str("## Summary\n\n");
            out.push_str(&format!(
                "Average pass rate: **{:.1}%** over {} round(s), {}ms total.\n\n",
                agg.avg_pass_rate * 100.0,
                run.rounds,
                agg.total_duration_ms
            ));

            out.push_str("| Test | Pass | Fail | Rate | Avg (ms) |\n");
            out.push_str("|------|-----:|-----:|-----:|---------:|\n");
            for (name, stats) in &agg.test_stats {
                out.push_str(&format!(
                    "| {} | {} | {} | {:.1}% | {} |\n",
                    name,
                    stats.pass_count,
                    stats.fail_count,
                    stats.pass_rate * 100.0,
                    stats.avg_duration_ms
                ));
            }
            out.push('\n');
        }

        let failures: Vec<_> = run
            .summaries
            .iter()
            .flat_map(|s| s.results.iter().map(move |r| (s.round, r)))
            .filter(|(_, r)| !r.passed)
            .collect();

        if !failures.is_empty() {
            out.push_str("## Failures\n\n");
            for (round, result) in failures {
                out.push_str(&format!(
                    "### Round {}: {} ({})\n\n",
                    round, result.test_name, result.golden
                ));
                if let Some(code) = result.status_code {
                    out.push_str(&format!("Status: {code}\n\n"));
                }
                if let Some(error) = &result.error {
                    out.push_str("```\n");
                    out.push_str(error);
                    out.push_str("\n```\n\n");
                }
            }
        }

        out
    }

    fn run_report_text(&self, run: &StoredTestRun) -> String {
        let mut out = String::new();

        out.push_str(&format!("accountd test run {}\n", run.id));
        out.push_str(&format!("Target: {}\n", run.target));
        out.push_str(&format!("Started: {}\n", run.started_at.to_rfc3339()));
        out.push_str(&format!("Rounds: {}\n\n", run.rounds));

        for summary in &run.summaries {
            out.push_str(&format!(
                "Round {}: {}/{} passed ({:.1}%), {}ms\n",
                summary.round,
                summary.passed,
                summary.total,
                summary.pass_rate * 100.0,
                summary.duration_ms
            ));
            for result in &summary.results {
                let status = if result.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!(
                    "  [{status}] {:2}. {} ({}ms)\n",
                    result.test_number, result.test_name, result.duration_ms
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TestCase, TestResult, TestRoundSummary};
    use tempfile::tempdir;

    fn sample_run() -> StoredTestRun {
        let mut run = StoredTestRun::new("http://127.0.0.1:8080");
        let summary = TestRoundSummary::new(
            1,
            "http://127.0.0.1:8080",
            vec![
                TestResult::pass(TestCase::ListUsers, 15),
                TestResult::fail(TestCase::CreateUser, 20, "expected status 201, got 400"),
            ],
        );
        run.add_round(1, &summary);
        run.calculate_aggregate();
        run
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
        assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("pdf"), None);
    }

    #[test]
    fn test_markdown_report_lists_failures() {
        let dir = tempdir().unwrap();
        let generator = ReportGenerator::new(ResultsStorage::new(dir.path()));

        let report = generator.run_report(&sample_run(), ReportFormat::Markdown);
        assert!(report.contains("# accountd test run"));
        assert!(report.contains("## Failures"));
        assert!(report.contains("expected status 201, got 400"));
    }

    #[test]
    fn test_text_report_has_all_cases() {
        let dir = tempdir().unwrap();
        let generator = ReportGenerator::new(ResultsStorage::new(dir.path()));

        let report = generator.run_report(&sample_run(), ReportFormat::Text);
        assert!(report.contains("[PASS]"));
        assert!(report.contains("[FAIL]"));
        assert!(report.contains("List Users"));
    }
}
