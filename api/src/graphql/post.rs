//! Post types, the feed query and post mutations

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, SimpleObject};

use super::{request_context, timestamp};
use crate::app::{DynFeedService, DynPostService};
use crate::domain::entities::{FeedPage, Post, PostCreator, PostId};

pub struct PostObject(Post);

impl From<Post> for PostObject {
    fn from(post: Post) -> Self {
        Self(post)
    }
}

#[Object(name = "Post")]
impl PostObject {
    async fn id(&self) -> i32 {
        self.0.id.0
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    /// Leading characters of the body, for feed previews
    async fn text_snippet(&self) -> String {
        self.0.text_snippet()
    }

    async fn points(&self) -> i32 {
        self.0.points
    }

    async fn creator_id(&self) -> i32 {
        self.0.creator_id.0
    }

    async fn creator(&self) -> CreatorObject {
        self.0.creator.clone().into()
    }

    async fn created_at(&self) -> String {
        timestamp(self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        timestamp(self.0.updated_at)
    }

    /// Opaque position of this post in the feed; pass it back as `cursor`
    /// to continue after it
    async fn cursor(&self) -> String {
        self.0.cursor().to_string()
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Creator")]
pub struct CreatorObject {
    id: i32,
    username: String,
    email: String,
}

impl From<PostCreator> for CreatorObject {
    fn from(creator: PostCreator) -> Self {
        Self {
            id: creator.id.0,
            username: creator.username,
            email: creator.email,
        }
    }
}

#[derive(SimpleObject)]
pub struct PaginatedPosts {
    posts: Vec<PostObject>,
    has_more: bool,
}

impl From<FeedPage> for PaginatedPosts {
    fn from(page: FeedPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(Into::into).collect(),
            has_more: page.has_more,
        }
    }
}

#[derive(InputObject)]
pub struct PostInput {
    title: String,
    text: String,
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Newest posts first. `cursor` resumes after a previously returned post.
    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: i32,
        cursor: Option<String>,
    ) -> Result<PaginatedPosts> {
        let feed = ctx.data::<Arc<DynFeedService>>()?;
        let page = feed
            .fetch_page(limit, cursor.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(page.into())
    }

    async fn post(&self, ctx: &Context<'_>, id: i32) -> Result<Option<PostObject>> {
        let posts = ctx.data::<Arc<DynPostService>>()?;
        let post = posts.get(PostId(id)).await.map_err(|e| e.extend())?;
        Ok(post.map(Into::into))
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(&self, ctx: &Context<'_>, input: PostInput) -> Result<PostObject> {
        let user_id = request_context(ctx)
            .require_user()
            .map_err(|e| e.extend())?;
        let posts = ctx.data::<Arc<DynPostService>>()?;

        let post = posts
            .create(user_id, &input.title, &input.text)
            .await
            .map_err(|e| e.extend())?;
        Ok(post.into())
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: i32,
        title: Option<String>,
    ) -> Result<Option<PostObject>> {
        let posts = ctx.data::<Arc<DynPostService>>()?;
        let post = posts
            .update(PostId(id), title.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(post.map(Into::into))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: i32) -> Result<bool> {
        let posts = ctx.data::<Arc<DynPostService>>()?;
        posts.delete(PostId(id)).await.map_err(|e| e.extend())
    }

    /// Up (positive) or down (negative) vote. `false` when the vote was
    /// already recorded.
    async fn vote(&self, ctx: &Context<'_>, post_id: i32, value: i32) -> Result<bool> {
        let user_id = request_context(ctx)
            .require_user()
            .map_err(|e| e.extend())?;
        let posts = ctx.data::<Arc<DynPostService>>()?;

        posts
            .vote(user_id, PostId(post_id), value)
            .await
            .map_err(|e| e.extend())
    }
}
