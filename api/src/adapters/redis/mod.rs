//! Redis adapter
//!
//! Session and password reset token storage.

pub mod session_store;

pub use session_store::RedisSessionStore;
