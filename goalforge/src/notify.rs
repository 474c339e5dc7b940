//! Transient user notices
//!
//! Every action reports back through a short-lived notice. The board keeps a
//! single banner: posting replaces it, and `visible` stops returning it once
//! its duration has passed. A one-shot command has no screen to clear, so the
//! binary prints the whole drained history when the command returns.

use crate::config;
use crate::error::AppError;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        let duration = match level {
            NoticeLevel::Error => config::ERROR_NOTICE_DURATION,
            NoticeLevel::Success | NoticeLevel::Info => config::NOTICE_DURATION,
        };

        Self {
            level,
            text: text.into(),
            duration,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        if err.is_user_facing() {
            Notice::error(err.to_string())
        } else {
            Notice::error(format!("Something went wrong: {}", err))
        }
    }
}

#[derive(Debug)]
struct Shown {
    notice: Notice,
    since: Instant,
}

/// Holds the banner currently on screen plus everything posted since the
/// last drain.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Shown>,
    pending: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `notice`, replacing whatever is on screen
    pub fn post(&mut self, notice: Notice) {
        self.post_at(notice, Instant::now());
    }

    pub fn post_at(&mut self, notice: Notice, now: Instant) {
        tracing::debug!("Notice ({:?}): {}", notice.level, notice.text);
        self.pending.push(notice.clone());
        self.current = Some(Shown { notice, since: now });
    }

    /// The banner still on screen at `now`, if it has not expired
    pub fn visible(&mut self, now: Instant) -> Option<&Notice> {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|shown| now.duration_since(shown.since) >= shown.notice.duration);

        if expired {
            self.current = None;
        }

        self.current.as_ref().map(|shown| &shown.notice)
    }

    /// Everything posted since the previous drain, oldest first
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
