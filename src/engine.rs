//! Social graph engine: commands that change the snapshot and the queries
//! callers re-run afterwards.

use crate::config::Config;
use crate::id::{next_post_id, post_timestamp};
use crate::query;
use crate::store::Store;
use crate::types::{Account, Collection, Post, Profile, Rejection, Session, Snapshot};
use chrono::Utc;
use eyre::{Context, Result};
use std::path::Path;

/// Entry point for callers.
///
/// Commands only fail with `Err` when persistence fails. Expected refusals
/// (bad input, no session) come back as `false` or `None`.
pub struct Engine {
    store: Store,
    trending_limit: usize,
}

impl Engine {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            trending_limit: config.trending_limit,
        }
    }

    /// Open the store at `root` with the configuration found there.
    pub fn open(root: &Path) -> Result<Self> {
        let store = Store::open(root).context("Failed to open store")?;
        let config = Config::load(root).context("Failed to load config")?;
        Ok(Self::new(store, &config))
    }

    /// An engine over a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Store::in_memory(), &Config::default())
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.store.snapshot()
    }

    // -------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------

    /// Create an account. Does not log in.
    pub fn register(&mut self, username: &str, password: &str) -> Result<bool> {
        if let Err(reason) = self.check_register(username, password) {
            log::debug!("register '{}' refused: {}", username, reason);
            return Ok(false);
        }

        let account = Account {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.store
            .commit(Collection::Accounts, |s| s.accounts.push(account))
            .context("Failed to persist account")?;
        self.store
            .commit(Collection::Follows, |s| {
                s.follows.insert(username.to_string(), Vec::new());
            })
            .context("Failed to persist follow list")?;

        log::info!("Registered account '{}'", username);
        Ok(true)
    }

    fn check_register(&self, username: &str, password: &str) -> Result<(), Rejection> {
        if username.is_empty() {
            return Err(Rejection::EmptyUsername);
        }
        if password.is_empty() {
            return Err(Rejection::EmptyPassword);
        }
        if self.snapshot().account(username).is_some() {
            return Err(Rejection::UsernameTaken);
        }
        Ok(())
    }

    /// Log in with an exact username and password match.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        let matched = self
            .snapshot()
            .accounts
            .iter()
            .any(|a| a.username == username && a.password == password);
        if !matched {
            log::debug!("login '{}' refused: {}", username, Rejection::InvalidCredentials);
            return Ok(false);
        }

        let session = Session {
            username: username.to_string(),
        };
        self.store
            .commit(Collection::Session, |s| s.session = Some(session))
            .context("Failed to persist session")?;

        log::info!("Logged in as '{}'", username);
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store
            .commit(Collection::Session, |s| s.session = None)
            .context("Failed to persist session")
    }

    /// Publish a post as the logged-in account.
    pub fn create_post(&mut self, content: &str) -> Result<Option<Post>> {
        let Some(author) = self.snapshot().session_user().map(String::from) else {
            log::debug!("post refused: {}", Rejection::NotLoggedIn);
            return Ok(None);
        };
        let content = content.trim();
        if content.is_empty() {
            log::debug!("post refused: {}", Rejection::EmptyContent);
            return Ok(None);
        }

        let now = Utc::now();
        let last = self.snapshot().posts.iter().map(|p| p.id).max();
        let post = Post {
            id: next_post_id(last, now)?,
            author,
            content: content.to_string(),
            timestamp: post_timestamp(now),
        };

        let created = post.clone();
        self.store
            .commit(Collection::Posts, |s| s.posts.insert(0, post))
            .context("Failed to persist post")?;

        log::info!("'{}' posted {}", created.author, created.id);
        Ok(Some(created))
    }

    /// Follow `target`. Repeating is a no-op.
    pub fn follow(&mut self, target: &str) -> Result<()> {
        let user = match self.check_follow(target) {
            Ok(user) => user,
            Err(reason) => {
                log::debug!("follow '{}' refused: {}", target, reason);
                return Ok(());
            }
        };
        if self.snapshot().following_of(&user).iter().any(|f| f == target) {
            return Ok(());
        }

        self.store
            .commit(Collection::Follows, |s| {
                s.follows.entry(user.clone()).or_default().push(target.to_string());
            })
            .context("Failed to persist follow")?;

        log::info!("'{}' followed '{}'", user, target);
        Ok(())
    }

    fn check_follow(&self, target: &str) -> Result<String, Rejection> {
        let user = self.snapshot().session_user().ok_or(Rejection::NotLoggedIn)?;
        if target.is_empty() {
            return Err(Rejection::EmptyTarget);
        }
        if user == target {
            return Err(Rejection::SelfFollow);
        }
        Ok(user.to_string())
    }

    /// Stop following `target`. Unfollowing someone not followed is a no-op.
    pub fn unfollow(&mut self, target: &str) -> Result<()> {
        let Some(user) = self.snapshot().session_user().map(String::from) else {
            log::debug!("unfollow '{}' refused: {}", target, Rejection::NotLoggedIn);
            return Ok(());
        };
        if !self.snapshot().following_of(&user).iter().any(|f| f == target) {
            return Ok(());
        }

        self.store
            .commit(Collection::Follows, |s| {
                if let Some(list) = s.follows.get_mut(&user) {
                    list.retain(|f| f != target);
                }
            })
            .context("Failed to persist unfollow")?;

        log::info!("'{}' unfollowed '{}'", user, target);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    pub fn session_user(&self) -> Option<&str> {
        self.snapshot().session_user()
    }

    /// Registered usernames, oldest first.
    pub fn accounts(&self) -> Vec<String> {
        self.snapshot().accounts.iter().map(|a| a.username.clone()).collect()
    }

    pub fn account_exists(&self, username: &str) -> bool {
        self.snapshot().account(username).is_some()
    }

    pub fn followed_users(&self) -> Vec<String> {
        query::followed_users(self.snapshot())
    }

    pub fn feed(&self) -> Vec<Post> {
        query::feed(self.snapshot())
    }

    pub fn user_posts(&self, username: &str) -> Vec<Post> {
        query::user_posts(self.snapshot(), username)
    }

    pub fn search_posts(&self, query: &str) -> Vec<Post> {
        query::search_posts(self.snapshot(), query)
    }

    /// Top hashtags, using the configured limit.
    pub fn trending_tags(&self) -> Vec<String> {
        query::trending_tags(self.snapshot(), self.trending_limit)
    }

    pub fn trending_tags_limit(&self, limit: usize) -> Vec<String> {
        query::trending_tags(self.snapshot(), limit)
    }

    pub fn followers(&self, username: &str) -> Vec<String> {
        query::followers(self.snapshot(), username)
    }

    pub fn follower_count(&self, username: &str) -> usize {
        query::follower_count(self.snapshot(), username)
    }

    pub fn following_count(&self, username: &str) -> usize {
        query::following_count(self.snapshot(), username)
    }

    pub fn is_following(&self, username: &str) -> bool {
        query::is_following(self.snapshot(), username)
    }

    pub fn profile(&self, username: &str) -> Option<Profile> {
        query::profile(self.snapshot(), username)
    }
}
