//! Background fetching.
//!
//! Runs on a dedicated thread that owns the [`JobsApi`] and performs one
//! blocking request at a time.  The UI thread sends [`FetchRequest`]s and
//! drains [`FetchMsg`]s over [`mpsc`] channels, so the terminal keeps
//! redrawing while a request is on the wire.
//!
//! ## For contributors
//!
//! The worker does not decide *when* to fetch.  It serves whatever it is
//! asked for, in order.  The one-page-in-flight rule lives in
//! [`crate::feed`], not here.

use std::sync::mpsc;
use std::thread;

use crate::api::{ApiError, JobRecord, JobsApi, JobsPage};

/// Work the UI thread hands to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// One page of the feed (1-indexed).
    Page(u32),
    /// A single posting for the detail view.
    Job(String),
}

/// Completions sent back from the worker thread.
#[derive(Debug)]
pub enum FetchMsg {
    Page {
        page: u32,
        result: Result<JobsPage, ApiError>,
    },
    Job {
        id: String,
        result: Result<JobRecord, ApiError>,
    },
}

/// Handle to a running fetch worker.
///
/// Dropping the handle closes the request channel, which ends the thread
/// once its current request finishes.
pub struct Worker {
    requests: mpsc::Sender<FetchRequest>,
    completions: mpsc::Receiver<FetchMsg>,
}

impl Worker {
    /// A sender that can be handed to anything that issues requests.
    pub fn requests(&self) -> mpsc::Sender<FetchRequest> {
        self.requests.clone()
    }

    #[cfg(test)]
    pub fn send(&self, request: FetchRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Non-blocking: the next finished request, if any.
    pub fn try_recv(&self) -> Option<FetchMsg> {
        self.completions.try_recv().ok()
    }

    /// Block until the next request finishes.  `None` if the worker is gone.
    #[cfg(test)]
    pub fn recv(&self) -> Option<FetchMsg> {
        self.completions.recv().ok()
    }
}

/// Spawn the fetch worker thread.
pub fn spawn(api: Box<dyn JobsApi>) -> Worker {
    let (req_tx, req_rx) = mpsc::channel::<FetchRequest>();
    let (msg_tx, msg_rx) = mpsc::channel();

    thread::spawn(move || {
        for request in req_rx {
            let msg = match request {
                FetchRequest::Page(page) => {
                    tracing::debug!(page, "fetching page");
                    FetchMsg::Page {
                        page,
                        result: api.fetch_page(page),
                    }
                }
                FetchRequest::Job(id) => {
                    tracing::debug!(%id, "fetching job");
                    let result = api.fetch_job(&id);
                    FetchMsg::Job { id, result }
                }
            };
            // If the receiver is gone the UI has exited; stop serving.
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
        tracing::debug!("fetch worker shutting down");
    });

    Worker {
        requests: req_tx,
        completions: msg_rx,
    }
}
