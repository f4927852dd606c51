//! CLI argument parsing for murmur.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mur",
    about = "A local-first social feed: post, follow, search and trend",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/murmur/logs/murmur.log"
)]
pub struct Cli {
    /// Path to the murmur store directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new murmur store in the current directory
    Init,

    /// Create an account and log in
    Signup {
        username: String,
        password: String,

        /// Password again; must match
        #[arg(short, long)]
        confirm: Option<String>,
    },

    /// Create an account without logging in
    Register { username: String, password: String },

    /// Log in
    Login { username: String, password: String },

    /// Log out
    Logout,

    /// Show who is logged in
    Whoami,

    /// Publish a post
    Post {
        /// Post text; #hashtags are picked up for trending
        content: String,
    },

    /// Follow a user
    Follow { username: String },

    /// Unfollow a user
    Unfollow { username: String },

    /// List users you follow
    Following,

    /// List followers of a user (default: you)
    Followers { username: Option<String> },

    /// Show your feed
    Feed,

    /// Show posts by a user
    Posts { username: String },

    /// Show a user's profile
    Profile { username: String },

    /// Search posts by keyword or #hashtag
    Search { query: String },

    /// Show trending hashtags
    Trending {
        /// Number of tags (default from config, 10)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List registered users
    Users,

    /// Serve JSON requests from stdin, one per line
    Pipe,
}
