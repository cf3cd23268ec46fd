use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Transient status line shown for a short duration, the terminal rendition
/// of a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub duration: Duration,
}

impl Notification {
    pub fn success(text: &str, millis: u64) -> Notification {
        return Notification {
            level: NotificationLevel::Success,
            text: text.to_string(),
            duration: Duration::from_millis(millis),
        };
    }

    pub fn info(text: &str, millis: u64) -> Notification {
        return Notification {
            level: NotificationLevel::Info,
            text: text.to_string(),
            duration: Duration::from_millis(millis),
        };
    }

    pub fn error(text: &str, millis: u64) -> Notification {
        return Notification {
            level: NotificationLevel::Error,
            text: text.to_string(),
            duration: Duration::from_millis(millis),
        };
    }
}
