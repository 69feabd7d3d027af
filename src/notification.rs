//! Non-fatal diagnostics collected on a document
//!
//! The reader records what it had to skip or could not interpret instead of
//! failing. Each notification is also emitted as a `warn!` event when it is
//! raised.

use std::fmt;

/// Category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A record kind the codec does not model
    NotImplemented,
    /// Data that is recognised but cannot be kept
    NotSupported,
    /// A recoverable inconsistency, such as a dangling reference
    Warning,
    /// A section error downgraded by the failsafe read mode
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotImplemented => "NotImplemented",
            Self::NotSupported => "NotSupported",
            Self::Warning => "Warning",
            Self::Error => "Error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Notifications in the order they were raised
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.items.push(Notification::new(notification_type, message));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Notifications of one category
    pub fn of_type(&self, notification_type: NotificationType) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| n.notification_type == notification_type)
            .collect()
    }

    pub fn has_type(&self, notification_type: NotificationType) -> bool {
        self.items
            .iter()
            .any(|n| n.notification_type == notification_type)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_category() {
        let mut notifications = NotificationCollection::new();
        assert!(notifications.is_empty());

        notifications.notify(NotificationType::NotImplemented, "HELIX");
        notifications.notify(NotificationType::Warning, "dim style text style missing");
        notifications.notify(NotificationType::NotImplemented, "WIPEOUT");

        assert_eq!(notifications.len(), 3);
        assert_eq!(notifications.of_type(NotificationType::NotImplemented).len(), 2);
        assert!(notifications.has_type(NotificationType::Warning));
        assert!(!notifications.has_type(NotificationType::Error));

        notifications.clear();
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::NotSupported, "unknown section EXTRA skipped");
        assert_eq!(n.to_string(), "[NotSupported] unknown section EXTRA skipped");
    }
}
