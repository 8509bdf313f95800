//! HTTP client module for accountd testing
//!
//! Provides HTTP client functionality for exercising the accountd REST API.

mod client;

pub use client::{HttpClient, HttpRequest, HttpResponse};
