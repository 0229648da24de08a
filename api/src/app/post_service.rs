//! Post service
//!
//! Single-post reads and writes: create, fetch, retitle, delete and vote.

use std::sync::Arc;

use crate::domain::entities::{NewPost, Post, PostId, UserId, VoteOutcome, VoteValue};
use crate::domain::ports::PostRepository;
use crate::error::{AppError, DomainError};

/// Longest accepted post title, in characters
pub const MAX_TITLE_LENGTH: usize = 300;

/// Service for managing posts
pub struct PostService<PR>
where
    PR: PostRepository + ?Sized,
{
    posts: Arc<PR>,
}

impl<PR> PostService<PR>
where
    PR: PostRepository + ?Sized,
{
    pub fn new(posts: Arc<PR>) -> Self {
        Self { posts }
    }

    /// Find a post by ID
    pub async fn get(&self, id: PostId) -> Result<Option<Post>, AppError> {
        Ok(self.posts.find_by_id(id).await?)
    }

    /// Create a post owned by `creator`
    pub async fn create(&self, creator: UserId, title: &str, text: &str) -> Result<Post, AppError> {
        let title = validate_title(title)?;
        if text.trim().is_empty() {
            return Err(DomainError::Validation("text cannot be empty".to_string()).into());
        }

        let post = self
            .posts
            .create(&NewPost {
                title,
                text: text.to_string(),
                creator_id: creator,
            })
            .await?;

        tracing::info!(post_id = %post.id, creator_id = %creator, "Post created");
        Ok(post)
    }

    /// Update a post's title.
    ///
    /// Returns `None` when the post does not exist. With no title the post is
    /// returned unchanged.
    pub async fn update(&self, id: PostId, title: Option<&str>) -> Result<Option<Post>, AppError> {
        let Some(title) = title else {
            return self.get(id).await;
        };

        let title = validate_title(title)?;
        let updated = self.posts.update_title(id, &title).await?;

        if updated.is_some() {
            tracing::info!(post_id = %id, "Post title updated");
        }
        Ok(updated)
    }

    /// Delete a post. Returns whether it existed.
    pub async fn delete(&self, id: PostId) -> Result<bool, AppError> {
        let deleted = self.posts.delete(id).await?;
        if deleted {
            tracing::info!(post_id = %id, "Post deleted");
        }
        Ok(deleted)
    }

    /// Vote on a post. Returns `true` when the post's points changed.
    pub async fn vote(&self, user: UserId, id: PostId, value: i32) -> Result<bool, AppError> {
        let value = VoteValue::from_i32(value).ok_or_else(|| {
            DomainError::Validation("vote value must be positive or negative".to_string())
        })?;

        if self.posts.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {}", id)));
        }

        let outcome = self.posts.vote(id, user, value).await?;
        tracing::debug!(post_id = %id, user_id = %user, ?outcome, "Vote recorded");

        Ok(outcome != VoteOutcome::Unchanged)
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}
