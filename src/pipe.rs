//! Line-oriented request loop: one JSON [`Request`] per input line, one
//! JSON [`Response`] per output line.

use crate::engine::Engine;
use crate::protocol::{Request, Response};
use eyre::{Context, Result};
use std::io::{BufRead, Write};

/// Serve requests from `reader` until end of input.
///
/// Malformed lines are answered with an error response; only I/O failures
/// on `reader` or `writer` end the loop early.
pub fn serve<R: BufRead, W: Write>(engine: &mut Engine, reader: R, mut writer: W) -> Result<usize> {
    let mut handled = 0;

    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                log::debug!("Request: {:?}", request);
                handle_request(engine, request)
            }
            Err(e) => {
                log::warn!("Malformed request: {}", e);
                Response::error(format!("malformed request: {}", e))
            }
        };

        let response_json = serde_json::to_string(&response).context("Failed to serialize response")?;
        writeln!(writer, "{}", response_json).context("Failed to write response")?;
        writer.flush().context("Failed to flush response")?;
        handled += 1;
    }

    log::info!("Input closed after {} request(s)", handled);
    Ok(handled)
}

/// Handle a single request.
pub fn handle_request(engine: &mut Engine, request: Request) -> Response {
    match request {
        Request::Register { username, password } => match engine.register(&username, &password) {
            Ok(accepted) => Response::Accepted { accepted },
            Err(e) => Response::error(format!("{:#}", e)),
        },

        Request::Login { username, password } => match engine.login(&username, &password) {
            Ok(accepted) => Response::Accepted { accepted },
            Err(e) => Response::error(format!("{:#}", e)),
        },

        Request::Logout => match engine.logout() {
            Ok(()) => Response::Ok,
            Err(e) => Response::error(format!("{:#}", e)),
        },

        Request::CreatePost { content } => match engine.create_post(&content) {
            Ok(post) => Response::Post { post },
            Err(e) => Response::error(format!("{:#}", e)),
        },

        Request::Follow { target } => match engine.follow(&target) {
            Ok(()) => Response::Ok,
            Err(e) => Response::error(format!("{:#}", e)),
        },

        Request::Unfollow { target } => match engine.unfollow(&target) {
            Ok(()) => Response::Ok,
            Err(e) => Response::error(format!("{:#}", e)),
        },

        Request::FollowedUsers => Response::Usernames {
            usernames: engine.followed_users(),
        },

        Request::Feed => Response::Posts { posts: engine.feed() },

        Request::UserPosts { username } => Response::Posts {
            posts: engine.user_posts(&username),
        },

        Request::SearchPosts { query } => Response::Posts {
            posts: engine.search_posts(&query),
        },

        Request::TrendingTags { limit } => Response::Tags {
            tags: match limit {
                Some(limit) => engine.trending_tags_limit(limit),
                None => engine.trending_tags(),
            },
        },

        Request::FollowerCount { username } => Response::Count {
            count: engine.follower_count(&username),
        },

        Request::FollowingCount { username } => Response::Count {
            count: engine.following_count(&username),
        },

        Request::Profile { username } => match engine.profile(&username) {
            Some(profile) => Response::Profile { profile },
            None => Response::NotFound { username },
        },

        Request::Accounts => Response::Usernames {
            usernames: engine.accounts(),
        },

        Request::Whoami => Response::Session {
            username: engine.session_user().map(String::from),
        },

        Request::Ping => Response::Pong,
    }
}
