//! Shared test infrastructure for murmur integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use murmur::{Engine, Post, Store};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub engine: Engine,
}

impl TestEnv {
    /// Create a new test environment with an initialized on-disk store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Store::init(temp_dir.path()).expect("Failed to init store");
        let engine = Engine::open(temp_dir.path()).expect("Failed to open engine");
        Self { temp_dir, engine }
    }

    /// Re-open the engine from disk, dropping all in-memory state.
    pub fn reopen(&mut self) {
        self.engine = Engine::open(self.temp_dir.path()).expect("Failed to reopen engine");
    }

    /// Register a user with password "pw".
    pub fn register(&mut self, username: &str) {
        assert!(
            self.engine.register(username, "pw").expect("Failed to register"),
            "Expected registration of {} to succeed",
            username
        );
    }

    /// Log in as a user registered through [`TestEnv::register`].
    pub fn login(&mut self, username: &str) {
        assert!(
            self.engine.login(username, "pw").expect("Failed to log in"),
            "Expected login of {} to succeed",
            username
        );
    }

    /// Register several users at once.
    pub fn register_all(&mut self, usernames: &[&str]) {
        for username in usernames {
            self.register(username);
        }
    }

    /// Log in as `username` and publish `content`.
    pub fn post_as(&mut self, username: &str, content: &str) -> Post {
        self.login(username);
        self.engine
            .create_post(content)
            .expect("Failed to create post")
            .expect("Expected post to be accepted")
    }

    /// Log in as `username` and follow `target`.
    pub fn follow_as(&mut self, username: &str, target: &str) {
        self.login(username);
        self.engine.follow(target).expect("Failed to follow");
    }

    /// Contents of the current feed, newest first.
    pub fn feed_contents(&self) -> Vec<String> {
        self.engine.feed().into_iter().map(|p| p.content).collect()
    }

    /// Assert that the session user follows `username` exactly once.
    pub fn assert_follows_once(&self, username: &str) {
        let followed = self.engine.followed_users();
        assert_eq!(
            followed.iter().filter(|f| *f == username).count(),
            1,
            "Expected {} exactly once in follow list {:?}",
            username,
            followed
        );
    }

    /// Assert that the session user does NOT follow `username`.
    pub fn assert_not_following(&self, username: &str) {
        let followed = self.engine.followed_users();
        assert!(
            !followed.iter().any(|f| f == username),
            "Expected {} to NOT be followed, follow list: {:?}",
            username,
            followed
        );
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
