//! Transient notices
//!
//! Success and error banners shown after loads and mutations. Each notice
//! expires after the board's TTL and can be dismissed earlier by id.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::render::{Html, HtmlBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeLevel {
    /// Bootstrap alert class
    pub fn alert_class(self) -> &'static str {
        match self {
            NoticeLevel::Success => "alert-success",
            NoticeLevel::Error => "alert-danger",
            NoticeLevel::Warning => "alert-warning",
            NoticeLevel::Info => "alert-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct BoardState {
    next_id: u64,
    notices: Vec<Notice>,
}

/// Shared notice list; clones see the same notices
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    state: Arc<Mutex<BoardState>>,
    ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState::default())),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a notice and return its id
    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let message = message.into();
        match level {
            NoticeLevel::Error => tracing::warn!(%message, "Error notice"),
            NoticeLevel::Warning => tracing::warn!(%message, "Warning notice"),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(%message, "Notice"),
        }

        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.notices.push(Notice {
            id,
            level,
            message,
            expires_at: Instant::now() + self.ttl,
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    /// Remove a notice before it expires
    pub fn dismiss(&self, id: u64) -> bool {
        let mut state = self.lock();
        let before = state.notices.len();
        state.notices.retain(|n| n.id != id);
        state.notices.len() != before
    }

    /// Notices still visible, oldest first; expired ones are dropped
    pub fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut state = self.lock();
        state.notices.retain(|n| n.expires_at > now);
        state.notices.clone()
    }

    /// Most recent visible notice
    pub fn latest(&self) -> Option<Notice> {
        self.active().pop()
    }

    pub fn clear(&self) {
        self.lock().notices.clear();
    }

    /// Dismissible alert markup for every visible notice
    pub fn to_html(&self) -> Html {
        let mut builder = HtmlBuilder::new();
        for notice in self.active() {
            let class = format!("alert {} alert-dismissible fade show", notice.level.alert_class());
            let id = notice.id.to_string();
            builder
                .open(
                    "div",
                    &[("class", class.as_str()), ("role", "alert"), ("data-notice", id.as_str())],
                )
                .text(&notice.message)
                .element(
                    "button",
                    &[
                        ("type", "button"),
                        ("class", "btn-close"),
                        ("data-action", "dismiss-notice"),
                        ("data-id", id.as_str()),
                    ],
                    "",
                )
                .close();
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notices_expire() {
        let board = NoticeBoard::new(Duration::from_secs(5));
        board.success("saved");
        tokio::time::advance(Duration::from_secs(3)).await;
        board.error("failed");
        assert_eq!(board.active().len(), 2);

        tokio::time::advance(Duration::from_secs(3)).await;
        let active = board.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "failed");
    }

    #[test]
    fn test_dismiss() {
        let board = NoticeBoard::default();
        let id = board.info("hello");
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert!(board.active().is_empty());
    }

    #[test]
    fn test_markup_is_escaped() {
        let board = NoticeBoard::default();
        board.error("<b>bad</b>");
        let html = board.to_html().into_string();
        assert!(html.contains("alert-danger"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains(r#"data-action="dismiss-notice""#));
    }
}
