//! Output formatters for test results
//!
//! Provides JSON, Table, CSV, and summary output formats.

#![allow(dead_code)]

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::executor::AggregateResult;
use crate::models::{TestResult, TestRoundSummary, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a single test result
    pub fn format_result(&self, result: &TestResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Csv => self.format_result_csv(result),
            OutputFormat::Summary => self.format_result_summary(result),
        }
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                TestStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                TestStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                TestStatus::Skip => "\x1b[33m○ SKIP\x1b[0m",
                TestStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                TestStatus::Pass => "✓ PASS",
                TestStatus::Fail => "✗ FAIL",
                TestStatus::Skip => "○ SKIP",
                TestStatus::Error => "! ERROR",
            }
        };

        let mut line = format!(
            "{:2}. {:20} {} [{:>6}ms]",
            result.test_case.number(),
            result.test_case.name(),
            status_str,
            result.duration_ms
        );

        // Mismatch details go on their own indented lines
        if result.status != TestStatus::Pass {
            if let Some(msg) = &result.message {
                for detail in msg.lines() {
                    line.push_str(&format!("\n      {detail}"));
                }
            }
        }

        line
    }

    fn format_result_csv(&self, result: &TestResult) -> String {
        format!(
            "{},{},{},{},{},\"{}\"",
            result.test_case.number(),
            result.test_case.name(),
            result.status,
            result.duration_ms,
            result
                .status_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            result
                .message
                .as_deref()
                .unwrap_or("")
                .replace('\n', " ")
                .replace('"', "\"\"")
        )
    }

    fn format_result_summary(&self, result: &TestResult) -> String {
        format!(
            "{} {} ({}ms)",
            result.status.symbol(),
            result.test_case.name(),
            result.duration_ms
        )
    }

    /// Format test round summary
    pub fn format_summary(&self, summary: &TestRoundSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Csv => self.format_summary_csv(summary),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &TestRoundSummary) -> String {
        let mut output = String::new();

        // Header
        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  Round {:3} - {:40} ║\n",
            summary.round, summary.target
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        // Results
        for result in &summary.results {
            output.push_str(&format!("║  {}  ║\n", self.format_result_line(result)));
        }

        // Footer
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:2} | Pass: {} | Fail: {} | Skip: {:2} | Error: {:2}     ║\n",
            summary.total, pass_str, fail_str, summary.skipped, summary.errors
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Duration: {:6}ms                      ║\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        // Mismatch details after the box, where they can wrap freely
        for result in &summary.results {
            if result.status == TestStatus::Fail || result.status == TestStatus::Error {
                if let Some(msg) = &result.message {
                    output.push_str(&format!("\n{}:\n", result.test_case));
                    for line in msg.lines() {
                        output.push_str(&format!("  {line}\n"));
                    }
                }
            }
        }

        output
    }

    /// Single-line variant used inside the summary box
    fn format_result_line(&self, result: &TestResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                TestStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                TestStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                TestStatus::Skip => "\x1b[33m○ SKIP\x1b[0m",
                TestStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                TestStatus::Pass => "✓ PASS",
                TestStatus::Fail => "✗ FAIL",
                TestStatus::Skip => "○ SKIP",
                TestStatus::Error => "! ERROR",
            }
        };

        format!(
            "{:2}. {:20} {} [{:>6}ms]",
            result.test_case.number(),
            result.test_case.name(),
            status_str,
            result.duration_ms
        )
    }

    fn format_summary_csv(&self, summary: &TestRoundSummary) -> String {
        let mut output = String::new();
        output.push_str("test_num,test_name,status,duration_ms,status_code,message\n");
        for result in &summary.results {
            output.push_str(&self.format_result_csv(result));
            output.push('\n');
        }
        output
    }

    fn format_summary_brief(&self, summary: &TestRoundSummary) -> String {
        format!(
            "{} - Round {}: {}/{} passed ({:.1}%) in {}ms",
            summary.target,
            summary.round,
            summary.passed,
            summary.total,
            summary.pass_rate(),
            summary.total_duration_ms
        )
    }

    /// Format aggregate results across rounds
    pub fn format_aggregate(&self, aggregate: &AggregateResult, target: &str) -> String {
        match self.format {
            OutputFormat::Table => self.format_aggregate_table(aggregate, target),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                #[derive(Serialize)]
                struct AggregateJson<'a> {
                    target: &'a str,
                    total_rounds: u32,
                    overall_pass_rate: f64,
                    test_pass_rates: HashMap<String, f64>,
                }

                let json = AggregateJson {
                    target,
                    total_rounds: aggregate.total_rounds,
                    overall_pass_rate: aggregate.overall_pass_rate,
                    test_pass_rates: aggregate
                        .test_pass_rates
                        .iter()
                        .map(|(k, v)| (k.name().to_string(), *v))
                        .collect(),
                };

                if self.format == OutputFormat::JsonPretty {
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                } else {
                    serde_json::to_string(&json).unwrap_or_default()
                }
            }
            _ => self.format_aggregate_table(aggregate, target),
        }
    }

    fn format_aggregate_table(&self, aggregate: &AggregateResult, target: &str) -> String {
        let mut output = String::new();

        output.push_str("\n═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Aggregate Results: {} ({} rounds)\n",
            target, aggregate.total_rounds
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output.push_str(&format!(
            " Overall Pass Rate: {:.1}%\n\n",
            aggregate.overall_pass_rate
        ));

        output.push_str(" Test Pass Rates:\n");
        output.push_str(" ───────────────────────────────────────────────────────────\n");

        let mut tests: Vec<_> = aggregate.test_pass_rates.iter().collect();
        tests.sort_by_key(|(tc, _)| tc.number());

        for (test_case, rate) in tests {
            let bar_len = (*rate / 5.0) as usize;
            let bar = "█".repeat(bar_len);
            let empty = "░".repeat(20usize.saturating_sub(bar_len));

            let rate_str = if self.colorize {
                if *rate >= 90.0 {
                    format!("\x1b[32m{rate:5.1}%\x1b[0m")
                } else if *rate >= 50.0 {
                    format!("\x1b[33m{rate:5.1}%\x1b[0m")
                } else {
                    format!("\x1b[31m{rate:5.1}%\x1b[0m")
                }
            } else {
                format!("{rate:5.1}%")
            };

            output.push_str(&format!(
                " {:2}. {:20} {} {} {}\n",
                test_case.number(),
                test_case.name(),
                bar,
                empty,
                rate_str
            ));
        }

        output.push_str(" ───────────────────────────────────────────────────────────\n");

        // Flaky tests
        let flaky = aggregate.flaky_tests();
        if !flaky.is_empty() {
            output.push_str("\n Flaky Tests (< 100% pass rate):\n");
            for (tc, rate) in flaky.iter().take(5) {
                output.push_str(&format!("   - {} ({:.1}%)\n", tc.name(), rate));
            }
        }

        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write results to a file
pub fn write_results_to_file(
    path: &str,
    summary: &TestRoundSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_summary(summary);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestCase;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    #[test]
    fn test_format_result() {
        let result = TestResult::pass(TestCase::ListUsers, 100);
        let formatter = ResultFormatter::new(OutputFormat::Summary);
        let output = formatter.format_result(&result);
        assert!(output.contains("List Users"));
    }

    #[test]
    fn test_format_csv_escapes_newlines() {
        let result = TestResult::fail(
            TestCase::GetUser,
            10,
            "body differs:\nline 1:\n  - a\n  + b",
        );
        let formatter = ResultFormatter::new(OutputFormat::Csv).no_color();
        let output = formatter.format_result(&result);
        assert!(!output.contains('\n'));
        assert!(output.contains("FAIL"));
    }

    #[test]
    fn test_summary_table_includes_failure_detail() {
        let summary = TestRoundSummary::new(
            1,
            "http://127.0.0.1:8080",
            vec![TestResult::fail(TestCase::GetUser, 10, "expected status 200, got 404")],
        );
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();
        let output = formatter.format_summary(&summary);
        assert!(output.contains("expected status 200, got 404"));
    }
}
