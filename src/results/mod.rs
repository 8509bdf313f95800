//! Results storage and reporting module
//!
//! Provides persistent storage and report generation for test runs.

#![allow(dead_code)]

mod report;
mod storage;

pub use report::{ReportFormat, ReportGenerator};
pub use storage::{
    ExportFormat, ResultsStorage, RunInfo, StoredTestRun, TestRunConfig,
};
