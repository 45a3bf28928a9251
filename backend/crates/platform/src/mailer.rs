//! Mail Transport
//!
//! Email delivery is an external collaborator: the domain only needs
//! `send(to, subject, body)` and a success/failure signal. The shipped
//! transport logs instead of delivering, which is enough for development
//! and for tests; a real SMTP transport plugs in behind the same trait.

use thiserror::Error;

/// Mail delivery failure, surfaced to the caller as a 500.
#[derive(Debug, Error)]
pub enum MailError {
    /// The transport reported a failure
    #[error("mail transport rejected the message: {0}")]
    Transport(String),
}

/// Email delivery transport
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver one message. Returns `Err` when the transport reports failure.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Development transport that logs the message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(
            to = %to,
            subject = %subject,
            body_len = body.len(),
            "Email dispatched via log transport"
        );
        Ok(())
    }
}
