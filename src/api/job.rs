//! Wire types shared by every call against the jobs backend.
//!
//! `JobRecord` is the one posting type the rest of the application sees.
//! The backend owns these records; the client deserializes them once and
//! never mutates a field afterwards.

use serde::{Deserialize, Serialize};

/// A single job posting as returned by `GET /jobs` and `GET /jobs/{id}`.
///
/// Missing collections and optional strings default to empty so that a
/// sparse record from the backend still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Backend identifier. Expected (not enforced) to be unique per session.
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub location: String,

    /// `remote`, `onsite` or `hybrid`, kept as the backend's free string.
    #[serde(default)]
    pub location_type: String,

    #[serde(default)]
    pub job_type: String,

    #[serde(default)]
    pub salary_min: f64,

    #[serde(default)]
    pub salary_max: f64,

    #[serde(default)]
    pub salary_currency: String,

    /// Full description in markdown.
    #[serde(default)]
    pub job_markdown: String,

    /// Precomputed plain-text description, when the backend provides one.
    #[serde(default)]
    pub job_plain_text: Option<String>,

    /// Display order matters: the first tag is the primary badge.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    /// Creation timestamp as sent by the backend (usually RFC 3339).
    #[serde(default)]
    pub created_at: String,

    /// Where the posting was originally found.
    #[serde(default)]
    pub post_url: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub source_group_id: String,
}

impl JobRecord {
    /// A salary is shown only when both bounds are positive.
    pub fn has_salary(&self) -> bool {
        self.salary_min > 0.0 && self.salary_max > 0.0
    }

    /// The tag rendered as the card's leading badge.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// Feed progress as reported by the backend.
///
/// Always replaced wholesale from a response; the client never computes
/// `total_pages` on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    /// 1-indexed.
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// `true` once the last page has been received.
    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// The `data` block of a list response: one page of jobs plus the cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsPage {
    pub jobs: Vec<JobRecord>,
    pub pagination: Pagination,
}

/// Response envelope for `GET /jobs`.
#[derive(Debug, Deserialize)]
pub(crate) struct JobsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<JobsPage>,
}

/// Response envelope for `GET /jobs/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct JobEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<JobRecord>,
}
