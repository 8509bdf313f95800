//! Test result models for accountd integration testing
//!
//! Defines test cases, results, and status types.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// All 9 test cases for the accountd user API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCase {
    // Read tests (1-3)
    ListUsers,
    GetUser,
    GetUserMissing,

    // Create tests (4-5)
    CreateUser,
    CreateUserInvalid,

    // Update tests (6-7)
    UpdateUser,
    UpdateUserMissing,

    // Delete tests (8-9)
    DeleteUser,
    DeleteUserMissing,
}

impl TestCase {
    /// Get test case number (1-9)
    pub fn number(&self) -> u8 {
        match self {
            TestCase::ListUsers => 1,
            TestCase::GetUser => 2,
            TestCase::GetUserMissing => 3,
            TestCase::CreateUser => 4,
            TestCase::CreateUserInvalid => 5,
            TestCase::UpdateUser => 6,
            TestCase::UpdateUserMissing => 7,
            TestCase::DeleteUser => 8,
            TestCase::DeleteUserMissing => 9,
        }
    }

    /// Get test case name
    pub fn name(&self) -> &'static str {
        match self {
            TestCase::ListUsers => "List Users",
            TestCase::GetUser => "Get User",
            TestCase::GetUserMissing => "Get Missing User",
            TestCase::CreateUser => "Create User",
            TestCase::CreateUserInvalid => "Create Invalid User",
            TestCase::UpdateUser => "Update User",
            TestCase::UpdateUserMissing => "Update Missing User",
            TestCase::DeleteUser => "Delete User",
            TestCase::DeleteUserMissing => "Delete Missing User",
        }
    }

    /// Golden file stem under the testdata directory
    pub fn golden_name(&self) -> &'static str {
        match self {
            TestCase::ListUsers => "list_users",
            TestCase::GetUser => "get_user",
            TestCase::GetUserMissing => "get_user_missing",
            TestCase::CreateUser => "create_user",
            TestCase::CreateUserInvalid => "create_user_invalid",
            TestCase::UpdateUser => "update_user",
            TestCase::UpdateUserMissing => "update_user_missing",
            TestCase::DeleteUser => "delete_user",
            TestCase::DeleteUserMissing => "delete_user_missing",
        }
    }

    /// Get test category
    pub fn category(&self) -> &'static str {
        match self {
            TestCase::ListUsers | TestCase::GetUser | TestCase::GetUserMissing => "Read",
            TestCase::CreateUser | TestCase::CreateUserInvalid => "Create",
            TestCase::UpdateUser | TestCase::UpdateUserMissing => "Update",
            TestCase::DeleteUser | TestCase::DeleteUserMissing => "Delete",
        }
    }

    /// Get all test cases, in table order
    pub fn all() -> Vec<TestCase> {
        vec![
            TestCase::ListUsers,
            TestCase::GetUser,
            TestCase::GetUserMissing,
            TestCase::CreateUser,
            TestCase::CreateUserInvalid,
            TestCase::UpdateUser,
            TestCase::UpdateUserMissing,
            TestCase::DeleteUser,
            TestCase::DeleteUserMissing,
        ]
    }

    /// Parse from test number
    pub fn from_number(n: u8) -> Option<TestCase> {
        match n {
            1 => Some(TestCase::ListUsers),
            2 => Some(TestCase::GetUser),
            3 => Some(TestCase::GetUserMissing),
            4 => Some(TestCase::CreateUser),
            5 => Some(TestCase::CreateUserInvalid),
            6 => Some(TestCase::UpdateUser),
            7 => Some(TestCase::UpdateUserMissing),
            8 => Some(TestCase::DeleteUser),
            9 => Some(TestCase::DeleteUserMissing),
            _ => None,
        }
    }

    /// Parse from golden-file stem
    pub fn from_golden_name(name: &str) -> Option<TestCase> {
        Self::all().into_iter().find(|c| c.golden_name() == name)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {}: {}", self.number(), self.name())
    }
}

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Skip => "○",
            TestStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub test_case: TestCase,
    pub status: TestStatus,
    pub duration_ms: u64,
    /// HTTP status returned by the service, when a response was received
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(test_case: TestCase, duration_ms: u64) -> Self {
        Self {
            test_case,
            status: TestStatus::Pass,
            duration_ms,
            status_code: None,
            message: None,
        }
    }

    pub fn fail(test_case: TestCase, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Fail,
            duration_ms,
            status_code: None,
            message: Some(message.into()),
        }
    }

    pub fn skip(test_case: TestCase, reason: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Skip,
            duration_ms: 0,
            status_code: None,
            message: Some(reason.into()),
        }
    }

    pub fn error(test_case: TestCase, error: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Error,
            duration_ms: 0,
            status_code: None,
            message: Some(error.into()),
        }
    }

    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.test_case,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of one round of case execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRoundSummary {
    pub round: u32,
    pub target: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestRoundSummary {
    pub fn new(round: u32, target: impl Into<String>, results: Vec<TestResult>) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == TestStatus::Pass)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == TestStatus::Fail)
            .count();
        let skipped = results
            .iter()
            .filter(|r| r.status == TestStatus::Skip)
            .count();
        let errors = results
            .iter()
            .filter(|r| r.status == TestStatus::Error)
            .count();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            round,
            target: target.into(),
            total,
            passed,
            failed,
            skipped,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestRoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} - {}", self.round, self.target)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_numbers() {
        assert_eq!(TestCase::ListUsers.number(), 1);
        assert_eq!(TestCase::DeleteUserMissing.number(), 9);
    }

    #[test]
    fn test_case_from_number() {
        assert_eq!(TestCase::from_number(1), Some(TestCase::ListUsers));
        assert_eq!(TestCase::from_number(9), Some(TestCase::DeleteUserMissing));
        assert_eq!(TestCase::from_number(10), None);
    }

    #[test]
    fn test_case_golden_names_roundtrip() {
        for case in TestCase::all() {
            assert_eq!(TestCase::from_golden_name(case.golden_name()), Some(case));
        }
        assert_eq!(TestCase::from_golden_name("no_such_case"), None);
    }

    #[test]
    fn test_all_cases() {
        let all = TestCase::all();
        assert_eq!(all.len(), 9);
    }

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass(TestCase::ListUsers, 100);
        assert!(result.status.is_success());
        assert_eq!(result.duration_ms, 100);
    }

    #[test]
    fn test_round_summary() {
        let results = vec![
            TestResult::pass(TestCase::ListUsers, 100),
            TestResult::fail(TestCase::GetUser, 50, "body mismatch"),
            TestResult::skip(TestCase::DeleteUser, "skipped by configuration"),
        ];

        let summary = TestRoundSummary::new(1, "http://127.0.0.1:8080", results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.is_all_passed());
    }
}
