//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod mail;
pub mod repositories;
pub mod sessions;

pub use mail::{Email, Mailer};
pub use repositories::{PostRepository, UserRepository};
pub use sessions::{SessionData, SessionId, SessionStore};
