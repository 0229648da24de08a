//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod feed_service;
pub mod password;
pub mod post_service;
pub mod user_service;

pub use feed_service::FeedService;
pub use post_service::PostService;
pub use user_service::{AuthOutcome, FieldError, UserService};

use crate::domain::ports::{Mailer, PostRepository, SessionStore, UserRepository};

/// Services as held by the HTTP and GraphQL layers, over any adapter
pub type DynFeedService = FeedService<dyn PostRepository>;
pub type DynPostService = PostService<dyn PostRepository>;
pub type DynUserService = UserService<dyn UserRepository, dyn SessionStore, dyn Mailer>;
