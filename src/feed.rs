//! Incremental job feed.
//!
//! [`FeedState`] is the accumulated job list plus the backend's pagination
//! cursor, changed only through a handful of explicit transitions.
//! [`FeedLoader`] pairs that state with the fetch worker's request channel
//! and enforces the loading rules:
//!
//! * at most one page request is outstanding at any time; extra triggers
//!   while one is in flight are dropped, not queued;
//! * nothing is requested past `total_pages`;
//! * a failed fetch leaves jobs and pagination untouched and sets a sticky
//!   flag that the next attempt clears.
//!
//! The loader is passive.  Something else (the scroll position, a key
//! press) decides when to call [`FeedLoader::request_next_page`].

use std::sync::mpsc;

use crate::api::{ApiError, JobRecord, JobsPage, Pagination};
use crate::fetch::FetchRequest;

/// Jobs received so far, in arrival order, and where the feed stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    jobs: Vec<JobRecord>,
    pagination: Pagination,
    in_flight: bool,
    failed: bool,
}

impl FeedState {
    /// Seed the feed from a first page fetched up front.
    pub fn initialize(seed: JobsPage) -> Self {
        Self {
            jobs: seed.jobs,
            pagination: seed.pagination,
            in_flight: false,
            failed: false,
        }
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// No pages left to ask for.
    pub fn is_terminal(&self) -> bool {
        self.pagination.is_last_page()
    }

    /// The page a new request would ask for, or `None` when a request is
    /// already in flight or the feed is exhausted.
    pub fn next_page(&self) -> Option<u32> {
        if self.in_flight || self.is_terminal() {
            None
        } else {
            Some(self.pagination.page + 1)
        }
    }

    /// Mark a request as issued.  Clears the failure flag whatever the
    /// request's eventual outcome.  Returns the page to fetch.
    pub fn begin_fetch(&mut self) -> Option<u32> {
        let page = self.next_page()?;
        self.in_flight = true;
        self.failed = false;
        Some(page)
    }

    /// Append a successfully fetched page and adopt its pagination block.
    ///
    /// Records are appended as-is; an id the backend repeats across pages
    /// shows up twice so the list stays reconcilable with `total`.
    pub fn apply_page(&mut self, page: JobsPage) {
        self.jobs.extend(page.jobs);
        self.pagination = page.pagination;
        self.in_flight = false;
    }

    /// Record a failed fetch without touching jobs or pagination.
    pub fn mark_failed(&mut self) {
        self.in_flight = false;
        self.failed = true;
    }
}

/// Owns the [`FeedState`] and issues page requests to the fetch worker.
pub struct FeedLoader {
    state: FeedState,
    requests: mpsc::Sender<FetchRequest>,
}

impl FeedLoader {
    pub fn new(seed: JobsPage, requests: mpsc::Sender<FetchRequest>) -> Self {
        let state = FeedState::initialize(seed);
        tracing::info!(
            jobs = state.jobs().len(),
            page = state.pagination().page,
            total_pages = state.pagination().total_pages,
            "feed initialized"
        );
        Self { state, requests }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Ask the worker for the next page.
    ///
    /// A no-op returning `false` while a request is in flight or once the
    /// last page has arrived.
    pub fn request_next_page(&mut self) -> bool {
        let Some(page) = self.state.begin_fetch() else {
            return false;
        };

        tracing::info!(page, "requesting next page");
        if self.requests.send(FetchRequest::Page(page)).is_err() {
            tracing::error!(page, "fetch worker is gone");
            self.state.mark_failed();
        }
        true
    }

    /// Apply the worker's answer for `page`.  Returns `false` when the
    /// answer is not for the request in flight and was ignored.
    pub fn complete(&mut self, page: u32, result: Result<JobsPage, ApiError>) -> bool {
        if !self.state.is_loading() || Some(page) != self.state.pagination().page.checked_add(1) {
            tracing::warn!(page, "ignoring completion for a page that was not requested");
            return false;
        }

        match result {
            Ok(jobs_page) => {
                tracing::info!(
                    page,
                    received = jobs_page.jobs.len(),
                    total_pages = jobs_page.pagination.total_pages,
                    "page applied"
                );
                self.state.apply_page(jobs_page);
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "page fetch failed");
                self.state.mark_failed();
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{make_job, ScriptedApi};
    use crate::fetch::{self, FetchMsg, Worker};

    fn page_of(ids: &[&str], page: u32, total_pages: u32) -> JobsPage {
        JobsPage {
            jobs: ids.iter().map(|id| make_job(id, id)).collect(),
            pagination: Pagination {
                total: 0,
                page,
                limit: 10,
                total_pages,
            },
        }
    }

    fn loader_for(api: &ScriptedApi) -> (FeedLoader, Worker) {
        let worker = fetch::spawn(Box::new(api.clone()));
        let loader = FeedLoader::new(api.seed(), worker.requests());
        (loader, worker)
    }

    /// Block until the worker answers and hand the answer to the loader.
    fn settle(loader: &mut FeedLoader, worker: &Worker) {
        match worker.recv() {
            Some(FetchMsg::Page { page, result }) => assert!(loader.complete(page, result)),
            other => panic!("expected a page completion, got {other:?}"),
        }
    }

    // -- pure transitions ----------------------------------------------------

    #[test]
    fn initialize_takes_seed_verbatim() {
        let state = FeedState::initialize(page_of(&["a", "b"], 1, 3));

        assert_eq!(state.jobs().len(), 2);
        assert_eq!(state.pagination().page, 1);
        assert!(!state.is_loading());
        assert!(!state.has_failed());
        assert_eq!(state.next_page(), Some(2));
    }

    #[test]
    fn begin_fetch_blocks_a_second_request() {
        let mut state = FeedState::initialize(page_of(&["a"], 1, 3));

        assert_eq!(state.begin_fetch(), Some(2));
        assert!(state.is_loading());
        assert_eq!(state.begin_fetch(), None);
    }

    #[test]
    fn apply_page_appends_in_arrival_order() {
        let mut state = FeedState::initialize(page_of(&["a", "b"], 1, 2));
        state.begin_fetch();
        state.apply_page(page_of(&["c", "d"], 2, 2));

        let ids: Vec<&str> = state.jobs().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert!(state.is_terminal());
        assert!(!state.is_loading());
    }

    #[test]
    fn apply_page_keeps_duplicate_ids() {
        let mut state = FeedState::initialize(page_of(&["a", "b"], 1, 2));
        state.begin_fetch();
        state.apply_page(page_of(&["b", "c"], 2, 2));

        assert_eq!(state.jobs().len(), 4);
    }

    #[test]
    fn apply_page_adopts_backend_pagination() {
        let mut state = FeedState::initialize(page_of(&["a"], 1, 3));
        state.begin_fetch();
        // The backend shrank the feed while we were reading it.
        state.apply_page(page_of(&["b"], 2, 2));

        assert_eq!(state.pagination().total_pages, 2);
        assert_eq!(state.next_page(), None);
    }

    #[test]
    fn mark_failed_leaves_jobs_and_pagination_unchanged() {
        let mut state = FeedState::initialize(page_of(&["a", "b"], 1, 2));
        let before = state.clone();

        state.begin_fetch();
        state.mark_failed();

        assert_eq!(state.jobs(), before.jobs());
        assert_eq!(state.pagination(), before.pagination());
        assert!(state.has_failed());
        assert!(!state.is_loading());
    }

    #[test]
    fn next_attempt_clears_failure_flag() {
        let mut state = FeedState::initialize(page_of(&["a"], 1, 2));
        state.begin_fetch();
        state.mark_failed();

        assert_eq!(state.begin_fetch(), Some(2), "retries the same page");
        assert!(!state.has_failed());
    }

    #[test]
    fn empty_seed_is_terminal() {
        let state = FeedState::initialize(JobsPage::default());
        assert!(state.is_terminal());
        assert_eq!(state.next_page(), None);
    }

    // -- loader against the worker ------------------------------------------

    #[test]
    fn loads_three_pages_to_the_end() {
        let api = ScriptedApi::with_feed(25, 10);
        let (mut loader, worker) = loader_for(&api);
        assert_eq!(loader.state().jobs().len(), 10);

        for _ in 0..2 {
            assert!(loader.request_next_page());
            settle(&mut loader, &worker);
        }

        assert_eq!(loader.state().jobs().len(), 25);
        assert_eq!(loader.state().pagination().page, 3);
        assert_eq!(loader.state().pagination().total_pages, 3);
        assert!(loader.state().is_terminal());

        // Exhausted: further triggers do nothing.
        assert!(!loader.request_next_page());
        assert!(!loader.request_next_page());
        assert_eq!(api.requested_pages(), vec![2, 3]);

        let ids: Vec<String> = loader.state().jobs().iter().map(|j| j.id.clone()).collect();
        let expected: Vec<String> = (1..=25).map(|i| format!("job-{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn ignores_triggers_while_in_flight() {
        let api = ScriptedApi::with_feed(30, 10);
        let (mut loader, worker) = loader_for(&api);

        assert!(loader.request_next_page());
        assert!(!loader.request_next_page());
        assert!(!loader.request_next_page());

        settle(&mut loader, &worker);
        assert_eq!(api.requested_pages(), vec![2]);
        assert_eq!(loader.state().jobs().len(), 20);
        assert!(worker.try_recv().is_none(), "nothing was queued");
    }

    #[test]
    fn failure_then_retry() {
        let api = ScriptedApi::with_feed(20, 10);
        let (mut loader, worker) = loader_for(&api);
        let before = loader.state().clone();

        api.fail_next_fetches(1);
        assert!(loader.request_next_page());
        settle(&mut loader, &worker);

        assert!(loader.state().has_failed());
        assert_eq!(loader.state().jobs(), before.jobs());
        assert_eq!(loader.state().pagination().page, 1);

        assert!(loader.request_next_page());
        assert!(!loader.state().has_failed(), "cleared as soon as the retry starts");
        settle(&mut loader, &worker);

        assert!(!loader.state().has_failed());
        assert_eq!(loader.state().jobs().len(), 20);
        assert_eq!(loader.state().pagination().page, 2);
        assert_eq!(api.requested_pages(), vec![2, 2]);
    }

    #[test]
    fn failed_retry_keeps_flag_set() {
        let api = ScriptedApi::with_feed(20, 10);
        let (mut loader, worker) = loader_for(&api);

        api.fail_next_fetches(2);
        loader.request_next_page();
        settle(&mut loader, &worker);
        loader.request_next_page();
        settle(&mut loader, &worker);

        assert!(loader.state().has_failed());
        assert_eq!(loader.state().jobs().len(), 10);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let api = ScriptedApi::with_feed(20, 10);
        let (mut loader, _worker) = loader_for(&api);
        let before = loader.state().clone();

        assert!(!loader.complete(2, Ok(page_of(&["x"], 2, 2))));

        assert_eq!(loader.state(), &before);
    }

    #[test]
    fn dead_worker_marks_failure() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut loader = FeedLoader::new(page_of(&["a"], 1, 2), tx);

        assert!(loader.request_next_page());
        assert!(loader.state().has_failed());
        assert!(!loader.state().is_loading());
    }
}
