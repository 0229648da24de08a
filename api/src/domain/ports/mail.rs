//! Outgoing mail port trait

use async_trait::async_trait;

use crate::error::DomainError;

/// An email to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), DomainError>;
}
