//! Feed service
//!
//! Keyset pagination over the post feed. Pages are ordered newest first and
//! resumed with a cursor (the position of the last post seen) rather than an
//! offset, so new posts arriving at the top never shift later pages.
//!
//! To learn whether another page exists without a count query, the service
//! asks the store for one row more than it returns: if that extra row comes
//! back, there is more.

use std::sync::Arc;

use crate::domain::entities::{FeedCursor, FeedPage, MAX_PAGE_SIZE};
use crate::domain::ports::PostRepository;
use crate::error::{AppError, DomainError};

/// Service for reading the post feed
pub struct FeedService<PR>
where
    PR: PostRepository + ?Sized,
{
    posts: Arc<PR>,
}

impl<PR> FeedService<PR>
where
    PR: PostRepository + ?Sized,
{
    pub fn new(posts: Arc<PR>) -> Self {
        Self { posts }
    }

    /// Fetch one page of the feed.
    ///
    /// `limit` is clamped to [`MAX_PAGE_SIZE`] and must be positive. `cursor`
    /// is the position to resume after (see [`FeedCursor`] for the accepted
    /// formats); `None` or an empty string starts from the newest post.
    pub async fn fetch_page(&self, limit: i32, cursor: Option<&str>) -> Result<FeedPage, AppError> {
        let real_limit = clamp_limit(limit)?;
        let cursor = parse_cursor(cursor)?;

        let fetch_count = real_limit + 1;
        let mut posts = self.posts.find_feed(fetch_count, cursor).await?;

        let has_more = posts.len() as u64 == fetch_count;
        posts.truncate(real_limit as usize);

        tracing::debug!(
            limit = real_limit,
            cursor = ?cursor.map(|c| c.to_string()),
            returned = posts.len(),
            has_more,
            "Fetched feed page"
        );

        Ok(FeedPage { posts, has_more })
    }
}

/// Clamp a requested page size to `1..=MAX_PAGE_SIZE`, rejecting non-positive values
pub fn clamp_limit(limit: i32) -> Result<u64, DomainError> {
    if limit < 1 {
        return Err(DomainError::Validation(format!(
            "limit must be a positive integer, got {}",
            limit
        )));
    }
    Ok((limit as u64).min(MAX_PAGE_SIZE))
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<FeedCursor>, DomainError> {
    match cursor.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<FeedCursor>()
            .map(Some)
            .map_err(DomainError::Validation),
    }
}
