//! Session store port trait
//!
//! Key-value storage for login sessions and password reset tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::UserId;
use crate::error::SessionError;

/// Opaque session identifier (the unsigned part of the session cookie)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session id (32 random bytes, hex encoded)
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self(hex::encode(bytes))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data stored for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: UserId,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for a user
    async fn create(&self, data: &SessionData) -> Result<SessionId, SessionError>;

    /// Load a session; `None` if unknown or expired
    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError>;

    /// End a session
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError>;

    /// Store a password reset token for a user
    async fn put_reset_token(&self, token: &str, user_id: UserId) -> Result<(), SessionError>;

    /// Consume a password reset token. A token can be taken at most once.
    async fn take_reset_token(&self, token: &str) -> Result<Option<UserId>, SessionError>;
}
