//! Redis-backed session store
//!
//! Sessions live under `sess:{id}` as JSON, reset tokens under
//! `forget-password:{token}` holding the user id. Both expire through Redis TTLs.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::entities::UserId;
use crate::domain::ports::{SessionData, SessionId, SessionStore};
use crate::error::SessionError;

const SESSION_PREFIX: &str = "sess:";
const RESET_TOKEN_PREFIX: &str = "forget-password:";

fn session_key(id: &SessionId) -> String {
    format!("{}{}", SESSION_PREFIX, id)
}

fn reset_token_key(token: &str) -> String {
    format!("{}{}", RESET_TOKEN_PREFIX, token)
}

pub struct RedisSessionStore {
    redis: ConnectionManager,
    session_ttl: Duration,
    reset_token_ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager, session_ttl: Duration, reset_token_ttl: Duration) -> Self {
        Self {
            redis,
            session_ttl,
            reset_token_ttl,
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, data: &SessionData) -> Result<SessionId, SessionError> {
        let id = SessionId::generate();
        let payload = serde_json::to_string(data)?;
        let mut conn = self.redis.clone();

        let _: () = conn
            .set_ex(session_key(&id), payload, self.session_ttl.as_secs())
            .await?;

        tracing::debug!(user_id = %data.user_id, "Session created");
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError> {
        let mut conn = self.redis.clone();
        let payload: Option<String> = conn.get(session_key(id)).await?;

        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(Into::into)
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut conn = self.redis.clone();
        let _: () = conn.del(session_key(id)).await?;
        Ok(())
    }

    async fn put_reset_token(&self, token: &str, user_id: UserId) -> Result<(), SessionError> {
        let mut conn = self.redis.clone();
        let _: () = conn
            .set_ex(
                reset_token_key(token),
                user_id.0,
                self.reset_token_ttl.as_secs(),
            )
            .await?;
        Ok(())
    }

    async fn take_reset_token(&self, token: &str) -> Result<Option<UserId>, SessionError> {
        let mut conn = self.redis.clone();
        // GETDEL so a token can only be redeemed once
        let user_id: Option<i32> = conn.get_del(reset_token_key(token)).await?;
        Ok(user_id.map(UserId))
    }
}
