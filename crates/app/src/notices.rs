//! Notice board — transient user messages that clear themselves.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pawfeed_domain::notice::{Notice, NoticeKind};

use crate::ports::FeederView;

/// Posts notices to the view and clears each one after a fixed lifetime.
///
/// A notice only clears itself if no newer notice replaced it in the
/// meantime. Posting requires a tokio runtime (expiry runs as a task).
pub struct NoticeBoard<V> {
    view: Arc<V>,
    ttl: Duration,
    latest: Arc<AtomicU64>,
}

impl<V> Clone for NoticeBoard<V> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            ttl: self.ttl,
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<V: FeederView> NoticeBoard<V> {
    /// Create a board rendering on `view`, with notices living for `ttl`.
    pub fn new(view: Arc<V>, ttl: Duration) -> Self {
        Self {
            view,
            ttl,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Show a notice and schedule its expiry. Returns the notice id.
    pub fn post(&self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let notice = Notice {
            id,
            kind,
            text: text.into(),
        };
        tracing::debug!(id, %kind, text = %notice.text, "notice posted");
        self.view.show_notice(&notice);

        let view = Arc::clone(&self.view);
        let latest = Arc::clone(&self.latest);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if latest.load(Ordering::Acquire) == id {
                view.clear_notice();
            }
        });

        id
    }

    pub fn info(&self, text: impl Into<String>) -> u64 {
        self.post(NoticeKind::Info, text)
    }

    pub fn success(&self, text: impl Into<String>) -> u64 {
        self.post(NoticeKind::Success, text)
    }

    pub fn warning(&self, text: impl Into<String>) -> u64 {
        self.post(NoticeKind::Warning, text)
    }

    pub fn error(&self, text: impl Into<String>) -> u64 {
        self.post(NoticeKind::Error, text)
    }
}
