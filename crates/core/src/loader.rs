//! Background dataset loading with last-request-wins semantics.

use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::error::{Error, FetchError, Result};
use crate::model::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug)]
pub enum LoadMsg {
    Loaded {
        request: RequestId,
        path: PathBuf,
        root: Node,
    },
    Failed {
        request: RequestId,
        error: Error,
    },
}

impl LoadMsg {
    pub fn request(&self) -> RequestId {
        match self {
            LoadMsg::Loaded { request, .. } | LoadMsg::Failed { request, .. } => *request,
        }
    }
}

/// Hands out increasing request ids and remembers the latest one.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestId {
        RequestId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> Option<RequestId> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestId(n)),
        }
    }

    pub fn is_current(&self, request: RequestId) -> bool {
        self.latest() == Some(request)
    }

    /// Passes `msg` through only if it answers the latest request.
    pub fn accept(&self, msg: LoadMsg) -> Option<LoadMsg> {
        if self.is_current(msg.request()) {
            Some(msg)
        } else {
            tracing::warn!(
                request = msg.request().0,
                latest = ?self.latest().map(|r| r.0),
                "discarding stale load"
            );
            None
        }
    }
}

/// Reads and parses one dataset document.
pub fn fetch(path: &Path) -> Result<Node> {
    let fail = |source: FetchError| Error::FetchFailure {
        path: path.to_path_buf(),
        source,
    };
    let text = std::fs::read_to_string(path).map_err(|e| fail(e.into()))?;
    let root: Node = serde_json::from_str(&text).map_err(|e| fail(e.into()))?;
    tracing::info!(path = %path.display(), children = root.children.len(), "dataset loaded");
    Ok(root)
}

pub struct Loader {
    tracker: RequestTracker,
    tx: Sender<LoadMsg>,
}

impl Loader {
    pub fn new(tracker: RequestTracker, tx: Sender<LoadMsg>) -> Self {
        Self { tracker, tx }
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Starts loading `path` on a worker thread and returns the request id
    /// its reply will carry.
    pub fn load(&self, path: PathBuf) -> RequestId {
        let request = self.tracker.issue();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let msg = match fetch(&path) {
                Ok(root) => LoadMsg::Loaded {
                    request,
                    path,
                    root,
                },
                Err(error) => {
                    tracing::warn!(request = request.0, %error, "load failed");
                    LoadMsg::Failed { request, error }
                }
            };
            let _ = tx.send(msg);
        });
        request
    }
}
