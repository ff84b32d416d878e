//! Transient user-facing notices.
//!
//! A session reports outcomes ("Deleted - you can undo", "No items
//! selected", ...) over an unbounded channel so sending never blocks the
//! next operation.

use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;

/// Sender side of the notice channel.
pub type NoticeSender = mpsc::UnboundedSender<Notice>;

/// Receiver side of the notice channel.
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Warn => write!(f, "! {}", self.message),
            NoticeLevel::Error => write!(f, "!! {}", self.message),
        }
    }
}

/// Create a notice channel.
pub fn channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Collect every notice currently queued without waiting.
pub fn drain(rx: &mut NoticeReceiver) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        out.push(notice);
    }
    out
}
