//! Request/response types for the line-oriented JSON interface.

use crate::types::{Post, Profile};
use serde::{Deserialize, Serialize};

/// A command or query sent to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Create an account.
    Register { username: String, password: String },

    /// Start a session.
    Login { username: String, password: String },

    /// End the session.
    Logout,

    /// Publish a post as the session user.
    CreatePost { content: String },

    /// Follow a user.
    Follow { target: String },

    /// Unfollow a user.
    Unfollow { target: String },

    /// Who the session user follows.
    FollowedUsers,

    /// The session user's feed.
    Feed,

    /// Posts by one user.
    UserPosts { username: String },

    /// Keyword search over post content.
    SearchPosts { query: String },

    /// Most used hashtags.
    TrendingTags {
        #[serde(default)]
        limit: Option<usize>,
    },

    /// Number of followers of a user.
    FollowerCount { username: String },

    /// Number of users a user follows.
    FollowingCount { username: String },

    /// Profile of one user.
    Profile { username: String },

    /// All registered usernames.
    Accounts,

    /// The session user, if any.
    Whoami,

    /// Liveness check.
    Ping,
}

/// The engine's answer to a [`Request`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Command completed.
    Ok,

    /// Whether a register/login was accepted.
    Accepted { accepted: bool },

    /// A post was created, or `None` if the post was refused.
    Post { post: Option<Post> },

    /// A list of posts, newest first.
    Posts { posts: Vec<Post> },

    /// A list of usernames.
    Usernames { usernames: Vec<String> },

    /// A list of hashtags.
    Tags { tags: Vec<String> },

    /// A follower/following count.
    Count { count: usize },

    /// A user profile.
    Profile { profile: Profile },

    /// No account with that username.
    NotFound { username: String },

    /// The session user, if any.
    Session { username: Option<String> },

    /// Pong response to ping.
    Pong,

    /// Error response.
    Error { message: String },
}

impl Response {
    /// Create an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
