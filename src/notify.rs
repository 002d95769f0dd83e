//! Transient user-facing notifications (toasts)

use serde::Serialize;
use std::collections::VecDeque;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// The action succeeded
    Success,
    /// The action was rejected
    Error,
}

/// What triggered a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Generate was attempted with blank input
    EmptyInput,
    /// The committed value was updated
    Generated,
    /// Logo file exceeded the upload limit
    LogoTooLarge,
    /// Logo file was not a decodable image
    LogoUnsupported,
    /// Logo was stored
    LogoUploaded,
    /// Plain export delivered at display resolution
    Downloaded,
    /// Plain export delivered at supersampled resolution
    DownloadedHighQuality,
    /// Export with logo overlay delivered
    DownloadedWithLogo,
}

impl NotificationKind {
    /// Severity implied by the kind
    pub fn level(self) -> NotificationLevel {
        match self {
            Self::EmptyInput | Self::LogoTooLarge | Self::LogoUnsupported => {
                NotificationLevel::Error
            }
            _ => NotificationLevel::Success,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::EmptyInput => "Please enter some text or URL",
            Self::Generated => "QR Code generated!",
            Self::LogoTooLarge => "Logo size should be less than 5MB",
            Self::LogoUnsupported => "Logo must be an image file",
            Self::LogoUploaded => "Logo uploaded successfully!",
            Self::Downloaded => "QR Code downloaded!",
            Self::DownloadedHighQuality => "High quality QR Code downloaded!",
            Self::DownloadedWithLogo => "QR Code with logo downloaded!",
        }
    }
}

/// A single toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Trigger
    pub kind: NotificationKind,
    /// Text shown to the user
    pub message: String,
}

impl From<NotificationKind> for Notification {
    fn from(kind: NotificationKind) -> Self {
        Self {
            level: kind.level(),
            kind,
            message: kind.message().to_string(),
        }
    }
}

/// Most notifications kept pending; older ones are dropped first
pub const QUEUE_CAPACITY: usize = 32;

/// FIFO of pending notifications, drained by whoever presents them
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    /// Queue a notification with its default wording and mirror it to the log.
    pub fn push(&mut self, kind: NotificationKind) {
        self.enqueue(Notification::from(kind));
    }

    /// Queue a notification with custom wording.
    pub fn push_with(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.enqueue(Notification {
            level: kind.level(),
            kind,
            message: message.into(),
        });
    }

    fn enqueue(&mut self, notification: Notification) {
        let kind = notification.kind;
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(kind = ?kind, "{}", notification.message)
            }
            NotificationLevel::Error => {
                tracing::warn!(kind = ?kind, "{}", notification.message)
            }
        }
        if self.queue.len() == QUEUE_CAPACITY {
            self.queue.pop_front();
        }
        self.queue.push_back(notification);
    }

    /// Most recent notification, if any
    pub fn last(&self) -> Option<&Notification> {
        self.queue.back()
    }

    /// Number of pending notifications
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove and return everything pending, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}
