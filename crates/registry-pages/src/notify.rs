//! Auto-dismissing notifications
//!
//! Every controller owns a [`NotificationCenter`]. Operations push one
//! notification per outcome; entries older than the TTL drop out of
//! [`NotificationCenter::active`] on their own.

use registry_client::RegistryError;
use std::fmt;
use std::time::{Duration, Instant};

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Operation succeeded
    Success,
    /// Input rejected before any request
    Warning,
    /// Request failed
    Error,
}

impl Severity {
    /// Lower-case name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Localized text
    pub message: String,
    /// Severity
    pub severity: Severity,
    /// When it was raised
    pub raised_at: Instant,
}

impl Notification {
    /// Whether the notification is still visible at `now`
    #[inline]
    #[must_use]
    pub fn is_visible(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) < ttl
    }
}

/// Notification queue with TTL-based dismissal
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    items: Vec<Notification>,
}

impl NotificationCenter {
    /// Create center with the given TTL
    #[inline]
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    /// TTL of new notifications
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Raise a notification
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%severity, %message, "notification raised");
        self.items.push(Notification {
            message,
            severity,
            raised_at: Instant::now(),
        });
    }

    /// Raise a success notification
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    /// Raise a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    /// Raise an error notification for a failed request
    ///
    /// Uses the server's message when it sent one, otherwise `fallback`.
    pub fn failure(&mut self, error: &RegistryError, fallback: &str) {
        self.push(Severity::Error, error.user_message(fallback));
    }

    /// Visible notifications, oldest first
    pub fn active(&mut self) -> &[Notification] {
        self.active_at(Instant::now())
    }

    /// Visible notifications as of `now`
    pub fn active_at(&mut self, now: Instant) -> &[Notification] {
        let ttl = self.ttl;
        self.items.retain(|n| n.is_visible(now, ttl));
        &self.items
    }

    /// Most recent notification, visible or not
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Dismiss everything
    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_notifications_drop_out() {
        let mut center = NotificationCenter::new(Duration::from_secs(4));
        center.success("done");
        let raised = center.latest().unwrap().raised_at;

        assert_eq!(center.active_at(raised + Duration::from_secs(3)).len(), 1);
        assert!(center.active_at(raised + Duration::from_secs(4)).is_empty());
        assert!(center.latest().is_none());
    }

    #[test]
    fn failure_prefers_server_message() {
        let mut center = NotificationCenter::default();
        let err = RegistryError::Status {
            status: 409,
            server_message: Some("Связь уже существует".to_string()),
        };
        center.failure(&err, "fallback");
        center.failure(&RegistryError::transport("refused"), "Ошибка создания связи");

        let active = center.active();
        assert_eq!(active[0].message, "Связь уже существует");
        assert_eq!(active[1].message, "Ошибка создания связи");
        assert_eq!(active[1].severity, Severity::Error);
    }
}
