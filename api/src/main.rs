//! lereddit API Server
//!
//! A small forum: users register, post short texts, vote on them and page
//! through the feed newest first, all over GraphQL.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use redis::aio::ConnectionManager;
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod graphql;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    ensure_schema, LogMailer, PostgresPostRepository, PostgresUserRepository, RedisSessionStore,
};
use app::{DynFeedService, DynUserService, FeedService, PostService, UserService};
use auth::SessionCookies;
use config::{Config, RateLimit};
use domain::ports::{Mailer, PostRepository, SessionStore, UserRepository};
use graphql::{build_schema, AppSchema};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub feed_service: Arc<DynFeedService>,
    pub user_service: Arc<DynUserService>,
    pub schema: AppSchema,
    pub cookies: SessionCookies,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router. `rate_limit` throttles `POST /graphql` per client IP,
/// which needs the server to provide `ConnectInfo<SocketAddr>`.
pub fn build_router(state: AppState, rate_limit: Option<RateLimit>) -> Result<Router> {
    let mut graphql_post = post(handlers::graphql_handler);
    if let Some(limit) = rate_limit {
        let governor_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_second(limit.per_second)
                .burst_size(limit.burst)
                .finish()
                .context("Invalid rate limit configuration")?,
        );
        graphql_post = graphql_post.layer(GovernorLayer {
            config: governor_config,
        });
    }

    let origin: HeaderValue = state
        .config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin: {}", state.config.cors_origin))?;

    let app = Router::new()
        // Health check
        .route("/health", get(health))
        // GraphQL (explorer on GET)
        .route("/graphql", get(handlers::graphiql).merge(graphql_post))
        // Feed as plain JSON
        .route("/posts", get(handlers::list_posts))
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_middleware,
        ))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lereddit_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting lereddit API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    ensure_schema(&db).await?;
    tracing::info!("Database connected");

    // Connect to Redis
    tracing::info!("Connecting to Redis...");
    let redis_client =
        redis::Client::open(config.redis_url.as_str()).context("Invalid REDIS_URL")?;
    let redis = ConnectionManager::new(redis_client)
        .await
        .context("Failed to connect to Redis")?;
    tracing::info!("Redis connected");

    // Create adapters
    let post_repo: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(db.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
    let session_store: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(
        redis,
        config.session_ttl,
        config.reset_token_ttl,
    ));
    // No SMTP relay yet; reset links go to the log
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

    // Create application services
    let feed_service = Arc::new(FeedService::new(post_repo.clone()));
    let post_service = Arc::new(PostService::new(post_repo.clone()));
    let user_service = Arc::new(UserService::new(
        user_repo,
        session_store,
        mailer,
        config.frontend_url.clone(),
    ));

    let cookies = SessionCookies::new(
        config.session_secret.clone(),
        config.production,
        config.session_ttl,
    );

    let schema = build_schema(
        feed_service.clone(),
        post_service,
        user_service.clone(),
        cookies.clone(),
    );

    // Create app state
    let state = AppState {
        feed_service,
        user_service,
        schema,
        cookies,
        config: config.clone(),
    };

    let app = build_router(state, Some(config.rate_limit))?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
