//! Post feed handlers
//!
//! The feed query as plain JSON, for clients that don't speak GraphQL.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Post;
use crate::error::AppError;
use crate::AppState;

/// Feed query params
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    #[serde(default = "default_limit")]
    pub limit: i32,
    pub cursor: Option<String>,
}

fn default_limit() -> i32 {
    10
}

/// Post as listed in the feed
#[derive(Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub post: Post,
    pub text_snippet: String,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedItem>,
    pub has_more: bool,
    /// Cursor for the next page, present when `has_more`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// GET /posts
///
/// One page of the feed, newest first.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
    let page = state
        .feed_service
        .fetch_page(params.limit, params.cursor.as_deref())
        .await?;

    let next_cursor = page.next_cursor().map(|cursor| cursor.to_string());

    let posts = page
        .posts
        .into_iter()
        .map(|post| FeedItem {
            text_snippet: post.text_snippet(),
            post,
        })
        .collect();

    Ok(Json(FeedResponse {
        posts,
        has_more: page.has_more,
        next_cursor,
    }))
}
