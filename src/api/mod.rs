//! Jobs backend abstraction layer.
//!
//! This module defines the [`JobsApi`] trait, the wire types in [`job`] and
//! the error type every backend call returns.  The only production
//! implementation is [`HttpJobsApi`], which talks to the paginated REST
//! endpoint over HTTP.
//!
//! ## For contributors — pointing at a different backend
//!
//! 1. Create a new file in this directory (e.g. `fixture.rs`).
//! 2. Define a struct and implement [`JobsApi`] for it.
//! 3. Add `mod fixture;` below and re-export it in the `pub use` block.
//! 4. Construct it in `main.rs` instead of [`HttpJobsApi`].
//!
//! The feed loader, the fetch worker and the UI never see which
//! implementation is in use.

mod http;
mod job;
#[cfg(test)]
mod scripted;

pub use http::HttpJobsApi;
pub use job::{JobRecord, JobsPage, Pagination};

#[cfg(test)]
pub(crate) use job::tests::make_job;
#[cfg(test)]
pub(crate) use scripted::ScriptedApi;

use thiserror::Error;

/// Everything that can go wrong while talking to the backend.
///
/// The feed loader collapses all of these into a single "fetch failed" flag;
/// the variants exist so the log says *why*.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed response body: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Job not found: {0}")]
    NotFound(String),
}

/// Trait that every jobs backend must implement.
///
/// Calls are made from the fetch worker thread, so implementations must be
/// [`Send`].  Each call is a single blocking round trip; retry and timeout
/// policy belong to the implementation's transport, not to callers.
pub trait JobsApi: Send {
    /// Fetch one page of the job feed.  `page` is 1-indexed.
    fn fetch_page(&self, page: u32) -> Result<JobsPage, ApiError>;

    /// Fetch a single posting by identifier.
    ///
    /// A `success: false` envelope maps to [`ApiError::NotFound`].
    fn fetch_job(&self, id: &str) -> Result<JobRecord, ApiError>;
}
