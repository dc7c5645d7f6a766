//! Notification senders - SMTP and a logging fallback.

mod logging;

#[cfg(feature = "smtp")]
mod smtp;

pub use logging::LogNotifier;

#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpNotifier};
