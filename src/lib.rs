//! Murmur: a local-first social feed engine.
//!
//! Murmur keeps accounts, posts, follow lists and the current session in a
//! small SQLite key-value store and derives feeds, profiles, search results
//! and trending hashtags from them on demand.
//!
//! # Example
//!
//! ```no_run
//! use murmur::{Engine, Store};
//! use std::path::Path;
//!
//! // Initialize a new store
//! Store::init(Path::new(".")).unwrap();
//! let mut engine = Engine::open(Path::new(".")).unwrap();
//!
//! // Two accounts, one following the other
//! engine.register("alice", "secret").unwrap();
//! engine.register("bob", "hunter2").unwrap();
//! engine.login("bob", "hunter2").unwrap();
//! engine.create_post("hello from bob #intro").unwrap();
//!
//! engine.login("alice", "secret").unwrap();
//! engine.follow("bob").unwrap();
//! engine.create_post("hi bob").unwrap();
//!
//! // Newest first: alice's post, then bob's
//! let feed = engine.feed();
//! assert_eq!(feed.len(), 2);
//! assert_eq!(engine.trending_tags(), vec!["#intro"]);
//! ```

mod id;
mod storage;
mod store;
mod types;

pub mod config;
pub mod engine;
pub mod pipe;
pub mod protocol;
pub mod query;

// Re-export public API
pub use config::Config;
pub use engine::Engine;
pub use protocol::{Request, Response};
pub use storage::{Backend, MemoryBackend, SqliteBackend};
pub use store::{Store, StoreError};
pub use types::{Account, Collection, FollowEdges, Post, Profile, Rejection, Session, Snapshot};
