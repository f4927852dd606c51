//! Core data types for the murmur social graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Unique, case-sensitive handle
    pub username: String,

    /// Compared by plain equality on login
    pub password: String,
}

/// A short message published by an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Creation time in epoch milliseconds, bumped to stay strictly increasing
    pub id: i64,

    /// Username of the account that posted
    pub author: String,

    /// Trimmed, never empty
    pub content: String,

    /// When posted (UTC, millisecond precision)
    pub timestamp: DateTime<Utc>,
}

/// The logged-in account, persisted as `{"username": ...}` or `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

/// Username -> usernames they follow, in the order they were followed.
pub type FollowEdges = BTreeMap<String, Vec<String>>;

/// Everything the store persists, held in memory as one value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub accounts: Vec<Account>,

    /// Newest first (insertion order)
    pub posts: Vec<Post>,

    pub follows: FollowEdges,

    pub session: Option<Session>,
}

impl Snapshot {
    /// Username of the logged-in account, if any.
    pub fn session_user(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// The follow list of `username`, empty if they have none.
    pub fn following_of(&self, username: &str) -> &[String] {
        self.follows.get(username).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One of the four independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Posts,
    Follows,
    Session,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Accounts,
        Collection::Posts,
        Collection::Follows,
        Collection::Session,
    ];

    /// Key under which the collection is persisted.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Accounts => "users",
            Collection::Posts => "posts",
            Collection::Follows => "followers",
            Collection::Session => "currentUser",
        }
    }
}

/// Profile view of a single account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub follower_count: usize,
    pub following_count: usize,

    /// Newest first
    pub posts: Vec<Post>,

    /// The logged-in account follows this one
    pub is_following: bool,

    /// This is the logged-in account's own profile
    pub is_self: bool,
}

/// Why a command was ignored or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyUsername,
    EmptyPassword,
    UsernameTaken,
    InvalidCredentials,
    NotLoggedIn,
    EmptyContent,
    EmptyTarget,
    SelfFollow,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyUsername => write!(f, "username cannot be empty"),
            Rejection::EmptyPassword => write!(f, "password cannot be empty"),
            Rejection::UsernameTaken => write!(f, "username already exists"),
            Rejection::InvalidCredentials => write!(f, "invalid username or password"),
            Rejection::NotLoggedIn => write!(f, "not logged in"),
            Rejection::EmptyContent => write!(f, "post content cannot be empty"),
            Rejection::EmptyTarget => write!(f, "no user given"),
            Rejection::SelfFollow => write!(f, "cannot follow yourself"),
        }
    }
}

impl std::error::Error for Rejection {}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(id: i64, author: &str, content: &str) -> Post {
        Post {
            id,
            author: author.to_string(),
            content: content.to_string(),
            timestamp: DateTime::from_timestamp_millis(id).unwrap(),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.accounts.is_empty());
        assert!(snapshot.posts.is_empty());
        assert!(snapshot.follows.is_empty());
        assert_eq!(snapshot.session_user(), None);
    }

    #[test]
    fn test_following_of_unknown_user() {
        let snapshot = Snapshot::default();
        assert!(snapshot.following_of("ghost").is_empty());
    }

    #[test]
    fn test_session_serializes_as_null_or_object() {
        let none: Option<Session> = None;
        assert_eq!(serde_json::to_string(&none).unwrap(), "null");

        let some = Some(Session {
            username: "alice".to_string(),
        });
        assert_eq!(serde_json::to_string(&some).unwrap(), r#"{"username":"alice"}"#);
    }

    #[test]
    fn test_post_timestamp_is_iso8601() {
        let post = make_post(1_714_564_800_123, "alice", "hello");
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.123Z");
        assert_eq!(json["id"], 1_714_564_800_123i64);
        assert_eq!(json["author"], "alice");
    }

    #[test]
    fn test_post_reads_original_layout() {
        let json = r#"{"id":1714564800123,"author":"bob","content":"hi #rust","timestamp":"2024-05-01T12:00:00.123Z"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, make_post(1_714_564_800_123, "bob", "hi #rust"));
    }

    #[test]
    fn test_collection_keys() {
        let keys: Vec<&str> = Collection::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["users", "posts", "followers", "currentUser"]);
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::UsernameTaken.to_string(), "username already exists");
        assert_eq!(Rejection::SelfFollow.to_string(), "cannot follow yourself");
    }
}
