//! Dual-channel notification sink.

use tracing::warn;

use crate::ports::{Notifier, Severity};

/// Title attached to every notification.
pub const APP_TITLE: &str = "Panorama Stitcher";

/// Fans each notification out to every channel (console, desktop, ...).
///
/// A channel that fails is logged and skipped; the others still deliver.
#[derive(Default)]
pub struct Broadcast<'a> {
    channels: Vec<&'a dyn Notifier>,
}

impl<'a> Broadcast<'a> {
    /// Creates a sink over `channels`.
    #[must_use]
    pub fn new(channels: Vec<&'a dyn Notifier>) -> Self {
        Self { channels }
    }

    /// Adds a channel.
    pub fn push(&mut self, channel: &'a dyn Notifier) {
        self.channels.push(channel);
    }

    /// Number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if there are no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Notifier for Broadcast<'_> {
    fn notify(&self, title: &str, message: &str, severity: Severity) -> anyhow::Result<()> {
        for channel in &self.channels {
            if let Err(e) = channel.notify(title, message, severity) {
                warn!("Notification channel failed: {e:#}");
            }
        }
        Ok(())
    }
}

/// Sends an informational notification under [`APP_TITLE`].
pub fn info(notifier: &dyn Notifier, message: &str) {
    send(notifier, message, Severity::Info);
}

/// Sends an error notification under [`APP_TITLE`].
pub fn error(notifier: &dyn Notifier, message: &str) {
    send(notifier, message, Severity::Error);
}

fn send(notifier: &dyn Notifier, message: &str, severity: Severity) {
    if let Err(e) = notifier.notify(APP_TITLE, message, severity) {
        warn!("Failed to deliver notification: {e:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Channel {
        fail: bool,
        seen: RefCell<Vec<(String, Severity)>>,
    }

    impl Notifier for Channel {
        fn notify(&self, _title: &str, message: &str, severity: Severity) -> anyhow::Result<()> {
            self.seen.borrow_mut().push((message.to_string(), severity));
            if self.fail {
                anyhow::bail!("channel down");
            }
            Ok(())
        }
    }

    #[test]
    fn test_broadcast_reaches_every_channel() {
        let console = Channel::default();
        let desktop = Channel {
            fail: true,
            ..Channel::default()
        };
        let sink = Broadcast::new(vec![&desktop as &dyn Notifier, &console]);

        error(&sink, "boom");
        info(&sink, "done");

        assert_eq!(sink.len(), 2);
        assert_eq!(console.seen.borrow().len(), 2);
        assert_eq!(desktop.seen.borrow().len(), 2);
        assert_eq!(console.seen.borrow()[0], ("boom".to_string(), Severity::Error));
    }
}
