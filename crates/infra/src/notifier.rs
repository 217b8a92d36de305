//! Transient single-slot notifications.

use chrono::{DateTime, Duration, Utc};

/// A message and the moment it was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

/// Holds at most one notification.
///
/// A new message replaces the current one and restarts its timer; nothing is
/// queued. A message is visible while less than `ttl` has elapsed.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    current: Option<Notification>,
}

impl Notifier {
    pub const DEFAULT_TTL_SECS: i64 = 3;

    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn show(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some(Notification {
            message: message.into(),
            shown_at: now,
        });
    }

    /// The visible notification at `now`, if any.
    pub fn current(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|n| now.signed_duration_since(n.shown_at) < self.ttl)
    }

    /// Close the notification early.
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::seconds(Self::DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_until_ttl_elapses() {
        let mut notifier = Notifier::default();
        let t0 = Utc::now();
        notifier.show("4x Widget added", t0);

        assert_eq!(
            notifier.current(t0 + Duration::milliseconds(2999)).map(|n| n.message.as_str()),
            Some("4x Widget added")
        );
        assert!(notifier.current(t0 + Duration::seconds(3)).is_none());
    }

    #[test]
    fn newer_message_supersedes_and_resets_timer() {
        let mut notifier = Notifier::default();
        let t0 = Utc::now();
        notifier.show("first", t0);
        notifier.show("second", t0 + Duration::seconds(2));

        let visible = notifier.current(t0 + Duration::seconds(4)).unwrap();
        assert_eq!(visible.message, "second");
        assert!(notifier.current(t0 + Duration::seconds(5)).is_none());
    }

    #[test]
    fn dismiss_clears_immediately() {
        let mut notifier = Notifier::default();
        let t0 = Utc::now();
        notifier.show("hello", t0);
        notifier.dismiss();
        assert!(notifier.current(t0).is_none());
    }
}
