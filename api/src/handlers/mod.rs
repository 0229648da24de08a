//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod graphql;
pub mod posts;

pub use graphql::{graphiql, graphql_handler};
pub use posts::list_posts;
