//! Test execution engine
//!
//! Provides strictly sequential execution of the request table.

mod runner;

pub use runner::{AggregateResult, SuiteRunner};
