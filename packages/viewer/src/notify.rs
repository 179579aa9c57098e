//! User-facing notifications.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// How a notification is presented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
    /// Something the user should check.
    Warning,
    /// Neutral information, e.g. an empty search.
    Info,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// How to present the message.
    pub severity: Severity,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// A notification with an explicit severity.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// A [`Severity::Success`] notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// A [`Severity::Error`] notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// A [`Severity::Info`] notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }
}

/// Receives notifications from the controller.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Writes notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        let Notification { severity, message } = notification;
        match severity {
            Severity::Error => log::error!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Success | Severity::Info => log::info!("[{severity}] {message}"),
        }
    }
}

/// Collects notifications in order.
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Sends each notification to both notifiers.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&mut self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_names_are_lowercase() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(
            serde_json::to_value(Notification::info("No matching results")).unwrap(),
            serde_json::json!({"severity": "info", "message": "No matching results"})
        );
    }

    #[test]
    fn borrowed_notifier_forwards() {
        fn send(mut notifier: impl Notifier) {
            notifier.notify(Notification::error("boom"));
        }

        let mut sink: Vec<Notification> = Vec::new();
        send(&mut sink);
        send(&mut sink);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0], Notification::error("boom"));
    }

    #[test]
    fn pair_notifies_both_in_order() {
        let mut pair = (Vec::new(), LogNotifier);
        pair.notify(Notification::success("Map reset successfully"));
        pair.notify(Notification::new(Severity::Warning, "Slow dataset"));

        let (collected, LogNotifier) = pair;
        assert_eq!(
            collected,
            vec![
                Notification::success("Map reset successfully"),
                Notification::new(Severity::Warning, "Slow dataset"),
            ]
        );
    }
}
