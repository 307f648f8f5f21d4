use chrono::{DateTime, Duration, Local};

/// How long a notification stays visible.
pub const NOTIFICATION_LIFETIME_MS: i64 = 2200;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub raised_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

/// The transient message line. A new notification replaces the visible one,
/// and each disappears on its own after its lifetime.
#[derive(Debug, Clone)]
pub struct Notifications {
    lifetime: Duration,
    current: Option<Notification>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::milliseconds(NOTIFICATION_LIFETIME_MS))
    }
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            current: None,
        }
    }

    pub fn push<S: Into<String>>(&mut self, message: S, now: DateTime<Local>) -> &Notification {
        self.current.insert(Notification {
            message: message.into(),
            raised_at: now,
            expires_at: now + self.lifetime,
        })
    }

    /// The notification still visible at `now`, if any.
    pub fn visible(&self, now: DateTime<Local>) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|notification| now < notification.expires_at)
    }
}
