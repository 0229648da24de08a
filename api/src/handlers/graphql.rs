//! GraphQL endpoint

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Extension,
};

use crate::auth::RequestContext;
use crate::AppState;

/// POST /graphql
///
/// Executes a query with the caller resolved by the session middleware.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state
        .schema
        .execute(request.into_inner().data(context))
        .await
        .into()
}

/// GET /graphql
///
/// Interactive GraphiQL explorer.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
