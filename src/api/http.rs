//! HTTP implementation of [`JobsApi`].
//!
//! Talks to the paginated REST backend with a blocking [`reqwest`] client.
//! Body decoding is split into pure `parse_*` functions so tests can
//! exercise the envelope handling without a network.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::job::{JobEnvelope, JobsEnvelope};
use super::{ApiError, JobRecord, JobsApi, JobsPage};

/// A jobs backend reachable over HTTP.
pub struct HttpJobsApi {
    client: Client,
    /// Base URL without a trailing slash, e.g. `https://example.com/api`.
    base_url: String,
    /// Page size sent as `limit`; `None` lets the backend decide.
    limit: Option<u32>,
}

impl HttpJobsApi {
    /// Create a new HTTP backend.
    ///
    /// # Arguments
    ///
    /// * `base_url` — prefix that `/jobs` is appended to.  Trailing slashes
    ///   are trimmed.
    /// * `limit` — optional page size forwarded on every list request.
    /// * `timeout` — whole-request timeout enforced by the transport.
    pub fn new(base_url: &str, limit: Option<u32>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decode a `GET /jobs` body.  `success: false` is an error even when
    /// the body is otherwise well formed.
    pub fn parse_jobs_body(body: &str) -> Result<JobsPage, ApiError> {
        let envelope: JobsEnvelope = serde_json::from_str(body)?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Rejected("response carried no data".into()))
    }

    /// Decode a `GET /jobs/{id}` body.  `success: false` means the record
    /// does not exist.
    pub fn parse_job_body(id: &str, body: &str) -> Result<JobRecord, ApiError> {
        let envelope: JobEnvelope = serde_json::from_str(body)?;
        match envelope.data {
            Some(job) if envelope.success => Ok(job),
            _ => {
                tracing::debug!(id, message = %envelope.message, "backend reported job missing");
                Err(ApiError::NotFound(id.to_string()))
            }
        }
    }
}

impl JobsApi for HttpJobsApi {
    fn fetch_page(&self, page: u32) -> Result<JobsPage, ApiError> {
        let url = format!("{}/jobs", self.base_url);
        let mut request = self.client.get(&url).query(&[("page", page)]);
        if let Some(limit) = self.limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text()?;
        Self::parse_jobs_body(&body)
    }

    fn fetch_job(&self, id: &str) -> Result<JobRecord, ApiError> {
        let url = format!("{}/jobs/{}", self.base_url, id);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text()?;
        Self::parse_job_body(id, &body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
