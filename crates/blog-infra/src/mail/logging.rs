//! Notifier that only logs - used when no SMTP host is configured.

use async_trait::async_trait;

use blog_core::ports::{Notification, Notifier, NotifyError};

#[derive(Debug, Clone)]
pub struct LogNotifier {
    from: String,
    to: String,
}

impl LogNotifier {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            from = %self.from,
            to = %self.to,
            subject = %notification.subject,
            body = %notification.body,
            "Mail transport not configured; notification logged only"
        );
        Ok(())
    }
}
