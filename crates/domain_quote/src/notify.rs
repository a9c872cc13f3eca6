//! Customer-facing notifications
//!
//! The wizard never talks to a toast singleton. It receives a [`Notifier`]
//! capability at construction time and reports validation and submission
//! failures through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use core_kernel::QuoteSessionId;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A message for the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub session_id: QuoteSessionId,
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    /// True when pressing submit again may succeed
    pub retryable: bool,
    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(session_id: QuoteSessionId, description: impl Into<String>) -> Self {
        Self {
            session_id,
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: description.into(),
            retryable: false,
            emitted_at: Utc::now(),
        }
    }

    pub fn info(session_id: QuoteSessionId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            session_id,
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
            retryable: false,
            emitted_at: Utc::now(),
        }
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

/// Capability for surfacing notifications to the customer
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!(
                session_id = %notification.session_id,
                retryable = notification.retryable,
                "{}: {}",
                notification.title,
                notification.description
            ),
            NotificationLevel::Info => tracing::info!(
                session_id = %notification.session_id,
                "{}: {}",
                notification.title,
                notification.description
            ),
        }
    }
}

/// Forwards notifications to an unbounded channel
///
/// A dropped receiver is not an error: the customer has gone away.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

/// Keeps every notification in memory for assertions
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.notifications.lock().map(|n| n.len()).unwrap_or(0)
    }
}

#[cfg(any(test, feature = "mock"))]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}
