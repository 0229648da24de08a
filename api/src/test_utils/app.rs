//! Services, schema and application state wired over the in-memory ports

use std::sync::Arc;
use std::time::Duration;

use crate::app::{
    DynFeedService, DynPostService, DynUserService, FeedService, PostService, UserService,
};
use crate::auth::SessionCookies;
use crate::config::Config;
use crate::domain::entities::{Post, User};
use crate::domain::ports::{Mailer, PostRepository, SessionStore, UserRepository};
use crate::graphql::{build_schema, AppSchema};
use crate::AppState;

use super::mocks::{
    InMemoryPostRepository, InMemorySessionStore, InMemoryUserRepository, RecordingMailer,
};

pub const TEST_SESSION_SECRET: &str = "test-secret";

/// In-memory ports, kept so tests can seed and inspect them
pub struct TestServices {
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl Default for TestServices {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    /// Seed posts (and their creators)
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let users = InMemoryUserRepository::new();
        let posts = InMemoryPostRepository::backed_by(&users).with_posts(posts);
        Self {
            users: Arc::new(users),
            posts: Arc::new(posts),
            sessions: Arc::new(InMemorySessionStore::new()),
            mailer: Arc::new(RecordingMailer::new()),
        }
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.insert(user);
        self
    }

    pub fn feed_service(&self) -> Arc<DynFeedService> {
        let posts: Arc<dyn PostRepository> = self.posts.clone();
        Arc::new(FeedService::new(posts))
    }

    pub fn post_service(&self) -> Arc<DynPostService> {
        let posts: Arc<dyn PostRepository> = self.posts.clone();
        Arc::new(PostService::new(posts))
    }

    pub fn user_service(&self) -> Arc<DynUserService> {
        let users: Arc<dyn UserRepository> = self.users.clone();
        let sessions: Arc<dyn SessionStore> = self.sessions.clone();
        let mailer: Arc<dyn Mailer> = self.mailer.clone();
        Arc::new(UserService::new(
            users,
            sessions,
            mailer,
            "http://localhost:3000".to_string(),
        ))
    }

    pub fn cookies(&self) -> SessionCookies {
        SessionCookies::new(TEST_SESSION_SECRET, false, Duration::from_secs(3600))
    }

    pub fn schema(&self) -> AppSchema {
        build_schema(
            self.feed_service(),
            self.post_service(),
            self.user_service(),
            self.cookies(),
        )
    }

    pub fn app_state(&self) -> AppState {
        let user_service = self.user_service();
        AppState {
            feed_service: self.feed_service(),
            schema: build_schema(
                self.feed_service(),
                self.post_service(),
                user_service.clone(),
                self.cookies(),
            ),
            user_service,
            cookies: self.cookies(),
            config: Config {
                session_secret: TEST_SESSION_SECRET.to_string(),
                ..Config::for_tests()
            },
        }
    }
}
