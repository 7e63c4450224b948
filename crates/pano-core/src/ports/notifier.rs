//! Notification port.

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational status.
    Info,
    /// A user-facing failure.
    Error,
}

/// A channel that delivers user-facing messages.
pub trait Notifier {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel could not deliver the message.
    fn notify(&self, title: &str, message: &str, severity: Severity) -> anyhow::Result<()>;
}
