//! GraphQL schema
//!
//! Resolvers read the services from schema data and the caller from the
//! per-request [`RequestContext`].

pub mod post;
pub mod user;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, MergedObject, Object, Schema};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::app::{DynFeedService, DynPostService, DynUserService};
use crate::auth::{RequestContext, SessionCookies};

#[derive(Default)]
pub struct HelloQuery;

#[Object]
impl HelloQuery {
    async fn hello(&self) -> &'static str {
        "Hello World"
    }
}

#[derive(MergedObject, Default)]
pub struct QueryRoot(HelloQuery, post::PostQuery, user::UserQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(post::PostMutation, user::UserMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(
    feed_service: Arc<DynFeedService>,
    post_service: Arc<DynPostService>,
    user_service: Arc<DynUserService>,
    cookies: SessionCookies,
) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(feed_service)
    .data(post_service)
    .data(user_service)
    .data(cookies)
    .finish()
}

/// The caller of the current request; anonymous when none was attached
fn request_context(ctx: &Context<'_>) -> RequestContext {
    ctx.data_opt::<RequestContext>().cloned().unwrap_or_default()
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
