//! Reader diagnostics.
//!
//! Non-fatal issues met while reading a drawing (a section that failed to
//! parse, an entity that was skipped, a page whose content stream could not be
//! decoded) are collected as `Notification` items instead of aborting the
//! extraction. The result assembler turns the `Warning` and `Error` items into
//! human-readable warnings on the final result.

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A section or entity type the engine does not interpret.
    NotImplemented,
    /// Non-fatal condition worth surfacing to the caller.
    Warning,
    /// Error that was recovered from by skipping input.
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading.
#[derive(Debug, Clone)]
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

    /// Whether this item should become a warning on the result
    pub fn is_user_visible(&self) -> bool {
        !matches!(self.notification_type, NotificationType::NotImplemented)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Collects notifications during a read.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification and mirror it to the log.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        let notification = Notification::new(notification_type, message);
        match notification_type {
            NotificationType::NotImplemented => log::debug!("{}", notification),
            NotificationType::Warning | NotificationType::Error => log::warn!("{}", notification),
        }
        self.items.push(notification);
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

    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Append every notification of `other`, keeping order.
    pub fn extend(&mut self, other: NotificationCollection) {
        self.items.extend(other.items);
    }

    /// Messages of the user-visible notifications, in the order recorded.
    pub fn user_messages(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|n| n.is_user_visible())
            .map(|n| n.message.clone())
            .collect()
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
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
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.notify(NotificationType::NotImplemented, "BLOCKS section skipped");
        c.notify(NotificationType::Error, "bad pair at line 12");
        c.notify(NotificationType::Warning, "page 2 has no content");

        assert_eq!(c.len(), 3);
        assert!(c.has_type(NotificationType::Error));
        assert_eq!(
            c.user_messages(),
            vec!["bad pair at line 12".to_string(), "page 2 has no content".to_string()]
        );
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut a = NotificationCollection::new();
        a.notify(NotificationType::Warning, "first");
        let mut b = NotificationCollection::new();
        b.notify(NotificationType::Warning, "second");
        a.extend(b);
        let messages: Vec<_> = a.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::Error, "ENTITIES section truncated");
        assert_eq!(format!("{}", n), "[Error] ENTITIES section truncated");
    }
}
