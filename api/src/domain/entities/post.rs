//! Post domain entity
//!
//! A short text post owned by a user, plus the types that describe a page of
//! the post feed and the cursor used to resume it.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Largest page the feed will ever return, whatever the caller asks for
pub const MAX_PAGE_SIZE: u64 = 50;

/// Number of characters kept by [`Post::text_snippet`]
pub const SNIPPET_LENGTH: usize = 50;

/// Unique identifier for a post (database-assigned, monotonically increasing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub i32);

impl From<i32> for PostId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimal projection of a post's owner, loaded alongside the post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCreator {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// A post together with its creator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub points: i32,
    pub creator_id: UserId,
    pub creator: PostCreator,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// First characters of the body, cut on a char boundary
    pub fn text_snippet(&self) -> String {
        self.text.chars().take(SNIPPET_LENGTH).collect()
    }

    /// Cursor that resumes the feed right after this post.
    pub fn cursor(&self) -> FeedCursor {
        FeedCursor {
            created_at: self.created_at,
            id: Some(self.id),
        }
    }
}

/// Data needed to create a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub creator_id: UserId,
}

/// Position in the feed: everything strictly older than this is returned.
///
/// A bare timestamp compares on `created_at` only. When the id is present the
/// comparison is on `(created_at, id)`, which stays exact when several posts
/// share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub created_at: DateTime<Utc>,
    pub id: Option<PostId>,
}

#[cfg(test)]
impl FeedCursor {
    pub fn at(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            id: None,
        }
    }

    /// True when a post with this key sorts after the cursor (i.e. belongs to a later page)
    pub fn admits(&self, created_at: DateTime<Utc>, id: PostId) -> bool {
        match self.id {
            None => created_at < self.created_at,
            Some(cursor_id) => (created_at, id) < (self.created_at, cursor_id),
        }
    }
}

impl std::fmt::Display for FeedCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ts = self
            .created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, true);
        match self.id {
            Some(id) => write!(f, "{},{}", ts, id),
            None => write!(f, "{}", ts),
        }
    }
}

impl std::str::FromStr for FeedCursor {
    type Err = String;

    /// Accepts an RFC 3339 timestamp or integer milliseconds since the epoch,
    /// optionally followed by `,<post id>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("cursor is empty".to_string());
        }

        let (ts_part, id_part) = match s.split_once(',') {
            Some((ts, id)) => (ts.trim(), Some(id.trim())),
            None => (s, None),
        };

        let created_at = parse_timestamp(ts_part)?;
        let id = id_part
            .map(|raw| {
                raw.parse::<i32>()
                    .map(PostId)
                    .map_err(|_| format!("invalid post id in cursor: {}", raw))
            })
            .transpose()?;

        Ok(Self { created_at, id })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(millis) = raw.parse::<i64>() {
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| format!("timestamp out of range: {}", raw));
    }

    Err(format!("invalid cursor timestamp: {}", raw))
}

/// One page of the post feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub has_more: bool,
}

impl FeedPage {
    /// Cursor for the page after this one, if there is one
    pub fn next_cursor(&self) -> Option<FeedCursor> {
        if !self.has_more {
            return None;
        }
        self.posts.last().map(Post::cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post_with_text(text: &str) -> Post {
        let now = Utc::now();
        Post {
            id: PostId(1),
            title: "title".to_string(),
            text: text.to_string(),
            points: 0,
            creator_id: UserId(1),
            creator: PostCreator {
                id: UserId(1),
                username: "bob".to_string(),
                email: "bob@bob.com".to_string(),
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn snippet_truncates_long_text() {
        let post = post_with_text(&"a".repeat(120));
        assert_eq!(post.text_snippet().len(), SNIPPET_LENGTH);
    }

    #[test]
    fn snippet_keeps_short_text() {
        let post = post_with_text("short");
        assert_eq!(post.text_snippet(), "short");
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let post = post_with_text(&"é".repeat(60));
        assert_eq!(post.text_snippet().chars().count(), SNIPPET_LENGTH);
    }

    #[test]
    fn cursor_parses_rfc3339() {
        let cursor: FeedCursor = "2021-03-04T05:06:07.123456Z".parse().unwrap();
        assert_eq!(cursor.created_at.timestamp_subsec_micros(), 123456);
        assert!(cursor.id.is_none());
    }

    #[test]
    fn cursor_parses_epoch_millis() {
        let cursor: FeedCursor = "1614834367123".parse().unwrap();
        assert_eq!(cursor.created_at.timestamp_millis(), 1614834367123);
    }

    #[test]
    fn cursor_parses_composite_key() {
        let cursor: FeedCursor = "2021-03-04T05:06:07Z,42".parse().unwrap();
        assert_eq!(cursor.id, Some(PostId(42)));
    }

    #[test]
    fn cursor_rejects_garbage() {
        assert!("yesterday".parse::<FeedCursor>().is_err());
        assert!("".parse::<FeedCursor>().is_err());
        assert!("2021-03-04T05:06:07Z,abc".parse::<FeedCursor>().is_err());
    }

    #[test]
    fn cursor_display_round_trips_full_precision() {
        let cursor = post_with_text("x").cursor();
        let parsed: FeedCursor = cursor.to_string().parse().unwrap();
        assert_eq!(parsed, cursor);
    }

    #[test]
    fn bare_timestamp_cursor_is_exclusive() {
        let t = Utc::now();
        let cursor = FeedCursor::at(t);
        assert!(!cursor.admits(t, PostId(1)));
        assert!(cursor.admits(t - Duration::milliseconds(1), PostId(99)));
    }

    #[test]
    fn composite_cursor_breaks_ties_on_id() {
        let t = Utc::now();
        let cursor = FeedCursor {
            created_at: t,
            id: Some(PostId(10)),
        };
        assert!(cursor.admits(t, PostId(9)));
        assert!(!cursor.admits(t, PostId(10)));
        assert!(!cursor.admits(t, PostId(11)));
    }

    #[test]
    fn next_cursor_only_when_more() {
        let page = FeedPage {
            posts: vec![post_with_text("x")],
            has_more: false,
        };
        assert!(page.next_cursor().is_none());
    }
}
