//! Mail adapter
//!
//! No SMTP relay is configured, so outgoing mail is written to the log.
//! Swap in a real transport behind the Mailer trait when one is available.

use async_trait::async_trait;

use crate::domain::ports::{Email, Mailer};
use crate::error::DomainError;

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), DomainError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.html,
            "Outgoing email"
        );
        Ok(())
    }
}
