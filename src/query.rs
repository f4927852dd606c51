//! Read-only views derived from a snapshot.
//!
//! Every function here is pure: it takes the snapshot by shared reference
//! and returns freshly built values. Post listings are newest first; posts
//! with equal timestamps keep their collection order.

use crate::types::{Post, Profile, Snapshot};
use std::collections::HashMap;

/// Default number of tags returned by [`trending_tags`].
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

/// Usernames the logged-in account follows, in follow order.
pub fn followed_users(snapshot: &Snapshot) -> Vec<String> {
    match snapshot.session_user() {
        Some(user) => snapshot.following_of(user).to_vec(),
        None => Vec::new(),
    }
}

/// Posts by the logged-in account and everyone it follows.
pub fn feed(snapshot: &Snapshot) -> Vec<Post> {
    let Some(user) = snapshot.session_user() else {
        return Vec::new();
    };
    let followed = snapshot.following_of(user);

    newest_first(
        snapshot
            .posts
            .iter()
            .filter(|p| p.author == user || followed.contains(&p.author)),
    )
}

/// All posts by `username`.
pub fn user_posts(snapshot: &Snapshot, username: &str) -> Vec<Post> {
    newest_first(snapshot.posts.iter().filter(|p| p.author == username))
}

/// Posts whose content contains `query`, ignoring case.
pub fn search_posts(snapshot: &Snapshot, query: &str) -> Vec<Post> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    newest_first(
        snapshot
            .posts
            .iter()
            .filter(|p| p.content.to_lowercase().contains(&needle)),
    )
}

/// Hashtag tokens of one post, lower-cased, in order of appearance.
pub fn hashtags(content: &str) -> Vec<String> {
    content
        .split_whitespace()
        .filter(|word| word.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// The `limit` most used hashtags across all posts.
///
/// Tags with equal counts keep the order in which they were first seen.
pub fn trending_tags(snapshot: &Snapshot, limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for post in &snapshot.posts {
        for tag in hashtags(&post.content) {
            match index.get(&tag) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(tag.clone(), counts.len());
                    counts.push((tag, 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(tag, _)| tag).collect()
}

/// Accounts following `username`, in registration order.
pub fn followers(snapshot: &Snapshot, username: &str) -> Vec<String> {
    snapshot
        .accounts
        .iter()
        .filter(|a| snapshot.following_of(&a.username).iter().any(|f| f == username))
        .map(|a| a.username.clone())
        .collect()
}

pub fn follower_count(snapshot: &Snapshot, username: &str) -> usize {
    followers(snapshot, username).len()
}

pub fn following_count(snapshot: &Snapshot, username: &str) -> usize {
    snapshot.following_of(username).len()
}

/// Whether the logged-in account follows `username`.
pub fn is_following(snapshot: &Snapshot, username: &str) -> bool {
    snapshot
        .session_user()
        .is_some_and(|user| snapshot.following_of(user).iter().any(|f| f == username))
}

/// Profile of `username`, or `None` if no such account exists.
pub fn profile(snapshot: &Snapshot, username: &str) -> Option<Profile> {
    let account = snapshot.account(username)?;

    Some(Profile {
        username: account.username.clone(),
        follower_count: follower_count(snapshot, username),
        following_count: following_count(snapshot, username),
        posts: user_posts(snapshot, username),
        is_following: is_following(snapshot, username),
        is_self: snapshot.session_user() == Some(username),
    })
}

fn newest_first<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<Post> {
    let mut posts: Vec<Post> = posts.cloned().collect();
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts
}
