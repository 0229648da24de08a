//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    FeedCursor, NewPost, NewUser, Post, PostCreator, PostId, User, UserId, VoteOutcome,
    VoteValue,
};
use crate::domain::ports::{
    Email, Mailer, PostRepository, SessionData, SessionId, SessionStore, UserRepository,
};
use crate::error::{DomainError, SessionError};

type UserTable = Arc<RwLock<HashMap<UserId, User>>>;

fn creator_of(user: &User) -> PostCreator {
    PostCreator {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: UserTable,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.insert(user);
        self
    }

    /// Add a user directly, bypassing uniqueness checks
    pub fn insert(&self, user: User) {
        self.users.write().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(DomainError::AlreadyExists(new_user.username.clone()));
        }

        // Ids continue after users seeded through the shared table
        let next_id = users.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let user = User {
            id: UserId(next_id),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("User {} not found", id))),
        }
    }
}

// ============================================================================
// In-Memory Post Repository
// ============================================================================

pub struct InMemoryPostRepository {
    posts: Arc<RwLock<HashMap<PostId, Post>>>,
    users: UserTable,
    votes: Arc<RwLock<HashMap<(UserId, PostId), VoteValue>>>,
    next_id: AtomicI32,
    last_feed_limit: RwLock<Option<u64>>,
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Arc::default(),
            users: Arc::default(),
            votes: Arc::default(),
            next_id: AtomicI32::new(1),
            last_feed_limit: RwLock::new(None),
        }
    }

    /// Share the user table of a user repository, so posts can be created
    /// for users registered through it
    pub fn backed_by(users: &InMemoryUserRepository) -> Self {
        Self {
            users: users.users.clone(),
            ..Self::new()
        }
    }

    /// Pre-populate with a user that can own posts
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    /// Pre-populate with posts (their creators are registered too)
    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        {
            let mut table = self.posts.write().unwrap();
            let mut users = self.users.write().unwrap();
            for post in posts {
                self.next_id.fetch_max(post.id.0 + 1, Ordering::SeqCst);
                users.entry(post.creator_id).or_insert_with(|| User {
                    id: post.creator.id,
                    username: post.creator.username.clone(),
                    email: post.creator.email.clone(),
                    password_hash: String::new(),
                    created_at: post.created_at,
                    updated_at: post.created_at,
                });
                table.insert(post.id, post);
            }
        }
        self
    }

    /// Row limit passed to the most recent `find_feed` call
    pub fn last_feed_limit(&self) -> Option<u64> {
        *self.last_feed_limit.read().unwrap()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_feed(
        &self,
        limit: u64,
        cursor: Option<FeedCursor>,
    ) -> Result<Vec<Post>, DomainError> {
        *self.last_feed_limit.write().unwrap() = Some(limit);

        let posts = self.posts.read().unwrap();
        let mut matching: Vec<Post> = posts
            .values()
            .filter(|p| cursor.map_or(true, |c| c.admits(p.created_at, p.id)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().unwrap().get(&id).cloned())
    }

    async fn create(&self, new_post: &NewPost) -> Result<Post, DomainError> {
        let creator = self
            .users
            .read()
            .unwrap()
            .get(&new_post.creator_id)
            .map(creator_of)
            .ok_or_else(|| {
                DomainError::NotFound(format!("User {} not found", new_post.creator_id))
            })?;

        let now = Utc::now();
        let post = Post {
            id: PostId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            title: new_post.title.clone(),
            text: new_post.text.clone(),
            points: 0,
            creator_id: new_post.creator_id,
            creator,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_title(&self, id: PostId, title: &str) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().unwrap();
        Ok(posts.get_mut(&id).map(|post| {
            post.title = title.to_string();
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete(&self, id: PostId) -> Result<bool, DomainError> {
        Ok(self.posts.write().unwrap().remove(&id).is_some())
    }

    async fn vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        value: VoteValue,
    ) -> Result<VoteOutcome, DomainError> {
        let mut posts = self.posts.write().unwrap();
        let mut votes = self.votes.write().unwrap();

        let post = posts
            .get_mut(&post_id)
            .ok_or_else(|| DomainError::NotFound(format!("Post {} not found", post_id)))?;

        let outcome = VoteOutcome::resolve(votes.get(&(user_id, post_id)).copied(), value);
        post.points += outcome.points_delta(value);
        votes.insert((user_id, post_id), value);
        Ok(outcome)
    }
}

/// Post repository whose store is always down
pub struct FailingPostRepository;

impl FailingPostRepository {
    fn error() -> DomainError {
        DomainError::Database("connection refused".to_string())
    }
}

#[async_trait]
impl PostRepository for FailingPostRepository {
    async fn find_feed(
        &self,
        _limit: u64,
        _cursor: Option<FeedCursor>,
    ) -> Result<Vec<Post>, DomainError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: PostId) -> Result<Option<Post>, DomainError> {
        Err(Self::error())
    }

    async fn create(&self, _post: &NewPost) -> Result<Post, DomainError> {
        Err(Self::error())
    }

    async fn update_title(&self, _id: PostId, _title: &str) -> Result<Option<Post>, DomainError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: PostId) -> Result<bool, DomainError> {
        Err(Self::error())
    }

    async fn vote(
        &self,
        _post_id: PostId,
        _user_id: UserId,
        _value: VoteValue,
    ) -> Result<VoteOutcome, DomainError> {
        Err(Self::error())
    }
}

// ============================================================================
// In-Memory Session Store
// ============================================================================

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionData>>,
    reset_tokens: RwLock<HashMap<String, UserId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// The live session, when exactly one exists
    pub fn only_session(&self) -> Option<(SessionId, SessionData)> {
        let sessions = self.sessions.read().unwrap();
        if sessions.len() != 1 {
            return None;
        }
        sessions.iter().next().map(|(id, data)| (id.clone(), data.clone()))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, data: &SessionData) -> Result<SessionId, SessionError> {
        let id = SessionId::generate();
        self.sessions
            .write()
            .unwrap()
            .insert(id.clone(), data.clone());
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions.write().unwrap().remove(id);
        Ok(())
    }

    async fn put_reset_token(&self, token: &str, user_id: UserId) -> Result<(), SessionError> {
        self.reset_tokens
            .write()
            .unwrap()
            .insert(token.to_string(), user_id);
        Ok(())
    }

    async fn take_reset_token(&self, token: &str) -> Result<Option<UserId>, SessionError> {
        Ok(self.reset_tokens.write().unwrap().remove(token))
    }
}

// ============================================================================
// Recording Mailer
// ============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    sent: RwLock<Vec<Email>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), DomainError> {
        self.sent.write().unwrap().push(email);
        Ok(())
    }
}
