//! In-memory [`JobsApi`] used by tests.
//!
//! Serves a fixed feed split into pages, can be told to fail the next N page
//! fetches, and records which pages were asked for.  Clones share state, so
//! a test keeps one handle while the fetch worker owns another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{make_job, ApiError, JobRecord, JobsApi, JobsPage, Pagination};

#[derive(Default)]
struct Script {
    pages: HashMap<u32, JobsPage>,
    jobs: HashMap<String, JobRecord>,
    fail_next: usize,
    requested: Vec<u32>,
}

#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    /// A feed of `total` jobs (`job-1` .. `job-N`) served `limit` at a time.
    pub fn with_feed(total: u64, limit: u32) -> Self {
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let mut script = Script::default();

        for page in 1..=total_pages {
            let first = u64::from(page - 1) * u64::from(limit) + 1;
            let last = (first + u64::from(limit) - 1).min(total);
            let jobs: Vec<JobRecord> = (first..=last)
                .map(|i| make_job(&format!("job-{i}"), &format!("Job {i}")))
                .collect();
            for job in &jobs {
                script.jobs.insert(job.id.clone(), job.clone());
            }
            script.pages.insert(
                page,
                JobsPage {
                    jobs,
                    pagination: Pagination {
                        total,
                        page,
                        limit,
                        total_pages,
                    },
                },
            );
        }

        Self {
            script: Arc::new(Mutex::new(script)),
        }
    }

    /// Page 1, as a server-rendered first load would hand it over.
    pub fn seed(&self) -> JobsPage {
        self.script.lock().unwrap().pages.get(&1).cloned().unwrap_or_default()
    }

    /// Make the next `n` page fetches fail with a transport-style error.
    pub fn fail_next_fetches(&self, n: usize) {
        self.script.lock().unwrap().fail_next = n;
    }

    /// Every page number passed to `fetch_page`, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.script.lock().unwrap().requested.clone()
    }
}

impl JobsApi for ScriptedApi {
    fn fetch_page(&self, page: u32) -> Result<JobsPage, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.requested.push(page);

        if script.fail_next > 0 {
            script.fail_next -= 1;
            return Err(ApiError::Rejected("simulated network failure".into()));
        }

        script
            .pages
            .get(&page)
            .cloned()
            .ok_or_else(|| ApiError::Rejected(format!("no page {page}")))
    }

    fn fetch_job(&self, id: &str) -> Result<JobRecord, ApiError> {
        self.script
            .lock()
            .unwrap()
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}
