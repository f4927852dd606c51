//! Murmur CLI - a local-first social feed.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use murmur::{Config, Engine, Post, Store, pipe};
use std::fs;
use std::io;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging(config: &Config) -> Result<()> {
    let log_dir = config.log_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("murmur")
            .join("logs")
    });

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("murmur.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_store_dir(cli: &Cli) -> PathBuf {
    cli.dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn render_content(content: &str) -> String {
    content
        .split(' ')
        .map(|word| {
            if word.starts_with('#') {
                word.magenta().to_string()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_posts(posts: &[Post], empty: &str) {
    if posts.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for post in posts {
        let when = post.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M");
        println!("{} {}", post.author.cyan().bold(), when.to_string().dimmed());
        println!("  {}", render_content(&post.content));
    }
}

fn print_usernames(usernames: &[String], empty: &str) {
    if usernames.is_empty() {
        println!("{}", empty.dimmed());
    } else {
        for username in usernames {
            println!("  {}", username.cyan());
        }
    }
}

/// The logged-in username, or exit with a hint to log in.
fn require_session(engine: &Engine) -> String {
    match engine.session_user() {
        Some(user) => user.to_string(),
        None => {
            eprintln!("{} Not logged in. Run 'mur login' first.", "✗".red());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let store_dir = get_store_dir(&cli);

    match cli.command {
        Command::Init => {
            Store::init(&store_dir).context("Failed to initialize murmur store")?;
            Config::init(&store_dir).context("Failed to write default config")?;
            println!("{} Initialized murmur store in {}", "✓".green(), store_dir.display());
        }

        Command::Signup {
            username,
            password,
            confirm,
        } => {
            if confirm.as_ref().is_some_and(|c| c != &password) {
                eprintln!("{} Passwords do not match", "✗".red());
                std::process::exit(1);
            }
            let mut engine = Engine::open(&store_dir)?;
            let (username, password) = (username.trim(), password.trim());

            if !engine.register(username, password).context("Failed to register")? {
                eprintln!("{} Username already exists or is empty", "✗".red());
                std::process::exit(1);
            }
            engine.login(username, password).context("Failed to log in")?;
            println!("{} Welcome, {}", "✓".green(), username.cyan());
        }

        Command::Register { username, password } => {
            let mut engine = Engine::open(&store_dir)?;
            let (username, password) = (username.trim(), password.trim());

            if engine.register(username, password).context("Failed to register")? {
                println!("{} Registered {}", "✓".green(), username.cyan());
            } else {
                eprintln!("{} Username already exists or is empty", "✗".red());
                std::process::exit(1);
            }
        }

        Command::Login { username, password } => {
            let mut engine = Engine::open(&store_dir)?;
            if engine
                .login(username.trim(), password.trim())
                .context("Failed to log in")?
            {
                println!("{} Logged in as {}", "✓".green(), username.trim().cyan());
            } else {
                eprintln!("{} Invalid username or password", "✗".red());
                std::process::exit(1);
            }
        }

        Command::Logout => {
            let mut engine = Engine::open(&store_dir)?;
            engine.logout().context("Failed to log out")?;
            println!("{} Logged out", "✓".green());
        }

        Command::Whoami => {
            let engine = Engine::open(&store_dir)?;
            match engine.session_user() {
                Some(user) => println!("{}", user.cyan()),
                None => println!("{}", "Not logged in".dimmed()),
            }
        }

        Command::Post { content } => {
            let mut engine = Engine::open(&store_dir)?;
            require_session(&engine);

            match engine.create_post(&content).context("Failed to create post")? {
                Some(post) => println!("{} Posted: {}", "✓".green(), render_content(&post.content)),
                None => {
                    eprintln!("{} Post cannot be empty", "✗".red());
                    std::process::exit(1);
                }
            }
        }

        Command::Follow { username } => {
            let mut engine = Engine::open(&store_dir)?;
            let user = require_session(&engine);

            if !engine.account_exists(&username) {
                eprintln!("{} User not found: {}", "✗".red(), username);
                std::process::exit(1);
            }
            if user == username {
                eprintln!("{} You cannot follow yourself", "✗".red());
                std::process::exit(1);
            }
            engine.follow(&username).context("Failed to follow")?;
            println!("{} Following {}", "✓".green(), username.cyan());
        }

        Command::Unfollow { username } => {
            let mut engine = Engine::open(&store_dir)?;
            require_session(&engine);

            engine.unfollow(&username).context("Failed to unfollow")?;
            println!("{} Unfollowed {}", "✓".green(), username.cyan());
        }

        Command::Following => {
            let engine = Engine::open(&store_dir)?;
            require_session(&engine);
            print_usernames(&engine.followed_users(), "Not following anyone yet");
        }

        Command::Followers { username } => {
            let engine = Engine::open(&store_dir)?;
            let username = match username {
                Some(username) => username,
                None => require_session(&engine),
            };
            print_usernames(&engine.followers(&username), "No followers yet");
        }

        Command::Feed => {
            let engine = Engine::open(&store_dir)?;
            require_session(&engine);
            print_posts(
                &engine.feed(),
                "No posts to show. Follow users or create your first post!",
            );
        }

        Command::Posts { username } => {
            let engine = Engine::open(&store_dir)?;
            print_posts(&engine.user_posts(&username), "No posts yet.");
        }

        Command::Profile { username } => {
            let engine = Engine::open(&store_dir)?;
            match engine.profile(&username) {
                Some(profile) => {
                    println!("{}", profile.username.cyan().bold());
                    println!(
                        "{} Followers  {} Following",
                        profile.follower_count.to_string().bold(),
                        profile.following_count.to_string().bold()
                    );
                    if profile.is_following {
                        println!("{}", "You follow this user".dimmed());
                    }
                    println!();
                    print_posts(&profile.posts, "No posts yet.");
                }
                None => {
                    eprintln!("{} User not found: {}", "✗".red(), username);
                    std::process::exit(1);
                }
            }
        }

        Command::Search { query } => {
            let engine = Engine::open(&store_dir)?;
            print_posts(&engine.search_posts(query.trim()), "No results found.");
        }

        Command::Trending { limit } => {
            let engine = Engine::open(&store_dir)?;
            let tags = match limit {
                Some(limit) => engine.trending_tags_limit(limit),
                None => engine.trending_tags(),
            };

            if tags.is_empty() {
                println!("{}", "Nothing trending yet".dimmed());
            } else {
                for (rank, tag) in tags.iter().enumerate() {
                    println!("{:>3}. {}", rank + 1, tag.magenta());
                }
            }
        }

        Command::Users => {
            let engine = Engine::open(&store_dir)?;
            print_usernames(&engine.accounts(), "No users registered");
        }

        Command::Pipe => {
            let mut engine = Engine::open(&store_dir)?;
            let stdin = io::stdin();
            pipe::serve(&mut engine, stdin.lock(), io::stdout().lock()).context("Request loop failed")?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_err) = match Config::load(&get_store_dir(&cli)) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    setup_logging(&config).context("Failed to setup logging")?;

    if let Some(e) = config_err {
        log::warn!("Using default config: {:#}", e);
        eprintln!("{} {:#}; using defaults", "Warning:".yellow().bold(), e);
    }

    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
