//! Notifier port: Trait for outbound text messages.
//!
//! This trait abstracts the messaging provider (WhatsApp Cloud API) from the
//! escalation logic.

/// Errors that can occur while delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Messaging not configured: missing {0}")]
    MissingConfig(&'static str),

    #[error("Messaging transport failed: {0}")]
    Transport(String),

    #[error("Messaging API rejected the request: HTTP {status}")]
    Rejected { status: u16 },

    #[error("Recipient must not be empty")]
    EmptyRecipient,
}

/// Trait for sending a plain text message to a phone number.
pub trait Notifier: Send + Sync {
    /// Send `body` to `to` (international format, digits only).
    ///
    /// # Errors
    /// Returns `NotifyError` if the message could not be delivered to the
    /// provider. Delivery to the handset is not confirmed.
    fn send_text(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}
