use std::sync::mpsc;

use ratatui::widgets::ListState;

use crate::api::{ApiError, JobRecord};
use crate::feed::FeedLoader;
use crate::fetch::{FetchMsg, FetchRequest};
use crate::markdown;

/// What the detail pane is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    /// Waiting on `GET /jobs/{id}`.
    Loading(String),
    Loaded(Box<JobRecord>),
    /// The backend said no such job, or the request failed.
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    List,
    Detail(Detail),
}

pub struct App {
    /// The job feed and its pagination.
    pub loader: FeedLoader,
    /// List selection state for scrolling.
    pub list_state: ListState,
    pub view: View,
    /// Vertical scroll offset of the detail pane.
    pub detail_scroll: u16,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last event worth telling the user about.
    pub status: String,
    /// Card preview text, index-aligned with the feed's jobs.
    pub previews: Vec<String>,
    /// Rows from the end of the list that count as "near the bottom".
    prefetch: usize,
    /// Detail lookups go straight to the worker; page requests go through
    /// the loader.
    requests: mpsc::Sender<FetchRequest>,
}

impl App {
    pub fn new(loader: FeedLoader, requests: mpsc::Sender<FetchRequest>, prefetch: usize) -> Self {
        let status = format!("Loaded {} jobs", loader.state().jobs().len());
        let mut app = Self {
            loader,
            list_state: ListState::default(),
            view: View::List,
            detail_scroll: 0,
            quit: false,
            status,
            previews: Vec::new(),
            prefetch,
            requests,
        };
        app.sync_previews();
        app
    }

    /// Summarize descriptions of newly appended jobs.  The feed only ever
    /// grows at the end, so earlier previews stay valid.
    fn sync_previews(&mut self) {
        let start = self.previews.len();
        let fresh: Vec<String> = self.loader.state().jobs()[start..]
            .iter()
            .map(markdown::preview_text)
            .collect();
        self.previews.extend(fresh);
    }

    pub fn jobs(&self) -> &[JobRecord] {
        self.loader.state().jobs()
    }

    /// Route a finished fetch to the feed or the detail pane.
    pub fn handle(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Page { page, result } => {
                let status = match &result {
                    Ok(p) => format!("Loaded page {page} ({} jobs)", p.jobs.len()),
                    Err(e) => format!("Page {page} failed: {e}"),
                };
                if self.loader.complete(page, result) {
                    self.status = status;
                    self.sync_previews();
                }
            }
            FetchMsg::Job { id, result } => self.show_detail(id, result),
        }
    }

    fn show_detail(&mut self, id: String, result: Result<JobRecord, ApiError>) {
        // The user may have backed out or opened another job meanwhile.
        if self.view != View::Detail(Detail::Loading(id.clone())) {
            tracing::debug!(%id, "dropping stale job detail");
            return;
        }

        self.view = View::Detail(match result {
            Ok(job) => Detail::Loaded(Box::new(job)),
            Err(e) => {
                tracing::warn!(%id, error = %e, "job detail unavailable");
                Detail::NotFound(id)
            }
        });
    }

    // -- feed triggers -------------------------------------------------------

    /// Scroll trigger: ask for the next page once the selection is within
    /// `prefetch` rows of the end.
    fn load_more_if_near_bottom(&mut self) {
        let len = self.jobs().len();
        let near_bottom = self
            .list_state
            .selected()
            .is_some_and(|i| i + self.prefetch + 1 >= len);

        if near_bottom && self.loader.request_next_page() {
            self.status = "Loading more jobs…".into();
        }
    }

    /// Manual trigger, also used as the retry affordance after a failure.
    pub fn load_more(&mut self) {
        if self.loader.request_next_page() {
            self.status = "Loading more jobs…".into();
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.jobs().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.jobs().len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.load_more_if_near_bottom();
    }

    pub fn select_previous(&mut self) {
        if self.jobs().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.jobs().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.jobs().is_empty() {
            self.list_state.select(Some(self.jobs().len() - 1));
            self.load_more_if_near_bottom();
        }
    }

    // -- detail view ---------------------------------------------------------

    /// Open the selected job and fetch its full record.
    pub fn open_selected(&mut self) {
        let Some(job) = self.list_state.selected().and_then(|i| self.jobs().get(i)) else {
            return;
        };
        let id = job.id.clone();

        tracing::info!(%id, "opening job detail");
        self.detail_scroll = 0;
        if self.requests.send(FetchRequest::Job(id.clone())).is_ok() {
            self.view = View::Detail(Detail::Loading(id));
        } else {
            self.view = View::Detail(Detail::NotFound(id));
        }
    }

    pub fn close_detail(&mut self) {
        self.view = View::List;
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }
}
