//! Data models for accountd integration testing
//!
//! This module contains all data structures used throughout the application.

mod target;
mod test_result;

pub use target::{SuiteConfig, TargetConfig};
pub use test_result::{TestCase, TestResult, TestRoundSummary, TestStatus};
