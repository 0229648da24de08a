//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    FeedCursor, NewPost, NewUser, Post, PostId, User, UserId, VoteOutcome, VoteValue,
};
use crate::error::DomainError;

/// Repository for Post entities
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Return up to `limit` posts ordered newest first (`created_at` desc, then `id` desc),
    /// restricted to posts strictly after `cursor` in that order when one is given.
    /// Every post comes with its creator, loaded in the same query.
    async fn find_feed(
        &self,
        limit: u64,
        cursor: Option<FeedCursor>,
    ) -> Result<Vec<Post>, DomainError>;

    /// Find a post by ID
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError>;

    /// Create a new post
    async fn create(&self, post: &NewPost) -> Result<Post, DomainError>;

    /// Replace the title of a post. Returns the updated post, or `None` if it does not exist.
    async fn update_title(&self, id: PostId, title: &str) -> Result<Option<Post>, DomainError>;

    /// Delete a post. Returns whether a row was removed.
    async fn delete(&self, id: PostId) -> Result<bool, DomainError>;

    /// Record a user's vote and adjust the post's points atomically
    async fn vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        value: VoteValue,
    ) -> Result<VoteOutcome, DomainError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user. Fails with `AlreadyExists` on a username or email clash.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Replace the stored password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), DomainError>;
}
