//! Integration tests for refusals and store-level errors.
//!
//! Expected failures come back as false / None; only persistence problems
//! are errors.

mod common;

use common::TestEnv;
use murmur::{Backend, Config, Engine, MemoryBackend, Store, StoreError};
use tempfile::TempDir;

/// Serves reads from a seeded map and refuses every write.
struct ReadOnlyBackend(MemoryBackend);

impl Backend for ReadOnlyBackend {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        self.0.get(key)
    }

    fn put(&mut self, key: &str, _value: &str) -> eyre::Result<()> {
        eyre::bail!("backend is read-only: {}", key)
    }
}

fn read_only_engine(seed: &[(&str, &str)]) -> Engine {
    let mut backend = MemoryBackend::new();
    for (key, value) in seed {
        backend.put(key, value).unwrap();
    }
    let store = Store::with_backend(Box::new(ReadOnlyBackend(backend))).unwrap();
    Engine::new(store, &Config::default())
}

// =============================================================================
// Registration and Login
// =============================================================================

#[test]
fn test_register_duplicate_returns_false() {
    let mut env = TestEnv::new();

    assert!(env.engine.register("a", "p").unwrap());
    assert!(!env.engine.register("a", "p2").unwrap());

    let accounts = &env.engine.snapshot().accounts;
    assert_eq!(accounts.iter().filter(|a| a.username == "a").count(), 1);
    assert_eq!(accounts[0].password, "p");
}

#[test]
fn test_register_empty_fields_return_false() {
    let mut env = TestEnv::new();

    assert!(!env.engine.register("", "p").unwrap());
    assert!(!env.engine.register("a", "").unwrap());
    assert!(env.engine.accounts().is_empty());
}

#[test]
fn test_login_wrong_password() {
    let mut env = TestEnv::new();
    env.engine.register("a", "p").unwrap();

    assert!(env.engine.login("a", "p").unwrap());
    assert!(!env.engine.login("a", "wrong").unwrap());
}

#[test]
fn test_failed_login_keeps_existing_session() {
    let mut env = TestEnv::new();
    env.register_all(&["alice", "bob"]);
    env.login("alice");

    assert!(!env.engine.login("bob", "wrong").unwrap());
    assert_eq!(env.engine.session_user(), Some("alice"));
}

#[test]
fn test_login_unknown_user() {
    let mut env = TestEnv::new();
    assert!(!env.engine.login("ghost", "pw").unwrap());
    assert_eq!(env.engine.session_user(), None);
}

#[test]
fn test_credentials_are_case_sensitive() {
    let mut env = TestEnv::new();
    env.engine.register("Alice", "Secret").unwrap();

    assert!(!env.engine.login("alice", "Secret").unwrap());
    assert!(!env.engine.login("Alice", "secret").unwrap());
    assert!(env.engine.register("alice", "x").unwrap());
}

// =============================================================================
// Posting
// =============================================================================

#[test]
fn test_post_without_session_is_none() {
    let mut env = TestEnv::new();
    assert!(env.engine.create_post("hello").unwrap().is_none());
    assert!(env.engine.snapshot().posts.is_empty());
}

#[test]
fn test_whitespace_post_is_none() {
    let mut env = TestEnv::new();
    env.register("alice");
    env.login("alice");

    assert!(env.engine.create_post("   \n\t ").unwrap().is_none());
    assert!(env.engine.snapshot().posts.is_empty());
}

// =============================================================================
// Store Errors
// =============================================================================

#[test]
fn test_open_uninitialized_dir_fails() {
    let temp_dir = TempDir::new().unwrap();

    let err = Engine::open(temp_dir.path()).err().unwrap();
    assert!(err.chain().any(|e| e.downcast_ref::<StoreError>().is_some()));
}

#[test]
fn test_corrupt_persisted_value_fails() {
    let mut backend = MemoryBackend::new();
    backend.put("followers", "[\"not a map\"]").unwrap();

    let err = Store::with_backend(Box::new(backend)).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::Corrupt { key: "followers", .. })
    ));
}

#[test]
fn test_fresh_backend_loads_empty() {
    let store = Store::with_backend(Box::new(MemoryBackend::new())).unwrap();
    let snapshot = store.snapshot();

    assert!(snapshot.accounts.is_empty());
    assert!(snapshot.posts.is_empty());
    assert!(snapshot.follows.is_empty());
    assert!(snapshot.session.is_none());
}

#[test]
fn test_init_twice_keeps_data() {
    let mut env = TestEnv::new();
    env.register("alice");

    Store::init(env.temp_dir.path()).unwrap();
    env.reopen();

    assert_eq!(env.engine.accounts(), vec!["alice"]);
}

#[test]
fn test_open_uninitialized_dir_mentions_init() {
    let temp_dir = TempDir::new().unwrap();

    let err = Engine::open(temp_dir.path()).err().unwrap();
    let message = format!("{:#}", err);
    assert!(message.starts_with("Failed to open store"), "message: {}", message);
    assert!(message.contains("mur init"), "message: {}", message);
    assert_eq!(message.matches("Failed to open store").count(), 1);
}

// =============================================================================
// Write Failures
// =============================================================================

#[test]
fn test_register_write_failure_is_error_and_not_applied() {
    let mut engine = read_only_engine(&[]);
    let before = engine.snapshot().clone();

    assert!(engine.register("alice", "pw").is_err());
    assert!(engine.accounts().is_empty());
    assert_eq!(engine.snapshot(), &before);

    // the retry is not mistaken for a duplicate
    assert!(engine.register("alice", "pw").is_err());
}

#[test]
fn test_post_and_follow_write_failures_not_applied() {
    let mut engine = read_only_engine(&[
        ("users", r#"[{"username":"alice","password":"pw"},{"username":"bob","password":"pw"}]"#),
        ("followers", r#"{"alice":[],"bob":[]}"#),
        ("currentUser", r#"{"username":"alice"}"#),
    ]);
    let before = engine.snapshot().clone();

    assert!(engine.create_post("hello").is_err());
    assert!(engine.follow("bob").is_err());
    assert!(engine.logout().is_err());

    assert_eq!(engine.snapshot(), &before);
    assert!(engine.feed().is_empty());
    assert!(engine.followed_users().is_empty());
    assert_eq!(engine.session_user(), Some("alice"));
}
