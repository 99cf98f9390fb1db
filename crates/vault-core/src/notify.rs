//! User-facing notifications

use serde::{Deserialize, Serialize};

/// Visual style of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }
}

/// Widget that renders notifications
pub trait NotificationSink {
    fn add_notification(&self, message: &str, kind: NotificationKind);
}

/// Where a message ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the notification widget
    Widget(Notification),
    /// Shown in a blocking alert dialog
    Alert(String),
    /// Written to the console log only
    Console(String),
}

impl Delivery {
    pub fn text(&self) -> &str {
        match self {
            Self::Widget(notification) => &notification.message,
            Self::Alert(text) | Self::Console(text) => text,
        }
    }
}

/// Blocking dialog used when no notification widget is reachable
pub trait Alert {
    fn alert(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_defaults_to_info() {
        let notification: Notification =
            serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert_eq!(notification, Notification::info("hello"));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&Notification::success("Saved")).unwrap();
        assert_eq!(json, r#"{"message":"Saved","kind":"success"}"#);
    }
}
