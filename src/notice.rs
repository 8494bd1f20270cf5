//! User-visible notifications.
//!
//! The core never renders anything. Failures worth telling the operator about
//! are posted here and drained by whatever presents them (toasts, CLI output).

use crate::error::SyncError;
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Pending notifications, oldest first.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    pending: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, notice: Notice) {
        tracing::debug!(title = %notice.title, "Posting notice");
        self.pending.lock().push(notice);
    }

    /// Post `err` under `title` unless it is a conflict, which stays silent.
    pub fn post_failure(&self, title: &str, err: &SyncError) {
        if err.is_user_visible() {
            self.post(Notice::error(title, err.to_string()));
        }
    }

    /// Remove and return everything pending.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
