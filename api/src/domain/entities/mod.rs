//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod post;
pub mod user;
pub mod vote;

pub use post::{
    FeedCursor, FeedPage, NewPost, Post, PostCreator, PostId, MAX_PAGE_SIZE, SNIPPET_LENGTH,
};
pub use user::{NewUser, User, UserId};
pub use vote::{VoteOutcome, VoteValue};
