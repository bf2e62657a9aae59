//! Transient user notifications.
//!
//! Widgets report outcomes ("Added to wishlist", network failures) as
//! notices that disappear on their own after a TTL. Hosts render
//! [`Notifier::active`]; every push is also published on the event bus.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::collection::{Event, EventBus};

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    notices: Arc<Mutex<VecDeque<Notice>>>,
    ttl: Duration,
    bus: EventBus,
}

impl Notifier {
    #[must_use]
    pub fn new(bus: EventBus, ttl: Duration) -> Self {
        Self { notices: Arc::new(Mutex::new(VecDeque::new())), ttl, bus }
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Error, message)
    }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) -> Uuid {
        self.push_at(level, message, Instant::now())
    }

    fn push_at(&self, level: NoticeLevel, message: impl Into<String>, now: Instant) -> Uuid {
        let notice = Notice { id: Uuid::new_v4(), level, message: message.into(), expires_at: now + self.ttl };
        let id = notice.id;
        self.lock().push_back(notice.clone());
        self.bus.publish(&Event::Notice(notice));
        id
    }

    /// Notices still visible at `now`, oldest first. Expired ones are dropped.
    pub fn active(&self, now: Instant) -> Vec<Notice> {
        let mut notices = self.lock();
        notices.retain(|n| n.expires_at > now);
        notices.iter().cloned().collect()
    }

    /// Remove a notice before it expires. Returns whether it was visible.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut notices = self.lock();
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    /// Most recent notice, expired or not.
    #[must_use]
    pub fn latest(&self) -> Option<Notice> {
        self.lock().back().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notice>> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
