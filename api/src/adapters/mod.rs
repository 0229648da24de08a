//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mail;
pub mod postgres;
pub mod redis;

pub use mail::LogMailer;
pub use postgres::{ensure_schema, PostgresPostRepository, PostgresUserRepository};
pub use self::redis::RedisSessionStore;
