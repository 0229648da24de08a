//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Timestamps are derived from a fixed instant so fixtures built twice compare equal.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::app::password::hash_password;
use crate::domain::entities::{Post, PostCreator, PostId, User, UserId};

/// Fixed reference instant for fixture timestamps
pub fn fixture_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
}

/// Create a test user with default values
pub fn test_user() -> User {
    User {
        id: UserId(1),
        username: "bob".to_string(),
        email: "bob@bob.com".to_string(),
        password_hash: String::new(),
        created_at: fixture_epoch(),
        updated_at: fixture_epoch(),
    }
}

/// Create a test user whose stored hash matches `password`
pub fn test_user_with_password(username: &str, password: &str) -> User {
    User {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: hash_password(password).unwrap(),
        ..test_user()
    }
}

/// Create a test post owned by [`test_user`]
pub fn test_post(id: i32, created_at: DateTime<Utc>) -> Post {
    let creator = test_user();
    Post {
        id: PostId(id),
        title: format!("Post {}", id),
        text: format!("Body of post number {}", id),
        points: 0,
        creator_id: creator.id,
        creator: PostCreator {
            id: creator.id,
            username: creator.username,
            email: creator.email,
        },
        created_at,
        updated_at: created_at,
    }
}

/// Create `count` posts with ids `1..=count`; a higher id is a newer post,
/// and no two posts share a timestamp.
pub fn test_posts(count: i32) -> Vec<Post> {
    (1..=count)
        .map(|id| test_post(id, fixture_epoch() + Duration::minutes(id as i64)))
        .collect()
}
