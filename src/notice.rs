//! User-facing outcome messages of async actions.

use crate::models::FailedReqMsg;
use crate::query::FetchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast. Sticky notices stay until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub sticky: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            sticky: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            sticky: false,
        }
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// The notice a resolved list fetch shows. Only a failure of the latest fetch
/// reaches the user; stale failures are dropped with their data.
pub fn fetch_notice(outcome: FetchOutcome, error: Option<String>) -> Option<Notice> {
    match (outcome, error) {
        (FetchOutcome::Failed, Some(message)) => Some(Notice::error(message)),
        _ => None,
    }
}

/// The server's `message` when the body carries one, `fallback` otherwise.
pub fn failure_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<FailedReqMsg>(body)
        .ok()
        .map(|failed| failed.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
