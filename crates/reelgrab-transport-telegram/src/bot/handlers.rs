use crate::bot::reply::{send_reply, Reply};
use anyhow::Result;
use reelgrab_core::fetch::{FetchError, Media, PostResolver};
use reelgrab_core::shortcode::extract_shortcode;
use std::fmt::Display;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{ChatId, ParseMode},
    utils::command::{BotCommands, ParseError},
};
use thiserror::Error;
use tracing::{error, info};

/// Reply for `/download` without a link.
pub const USAGE_MESSAGE: &str =
    "❌ Please provide an Instagram link.\nUsage: <code>/download &lt;url&gt;</code>";

/// Reply for a link without a recognisable post shortcode.
pub const INVALID_LINK_MESSAGE: &str =
    "❌ Invalid Instagram URL. Please send a valid post, reel, or TV link.";

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message with usage instructions
    #[command(description = "Show how to use the bot.")]
    Start,
    /// Download media from an Instagram post, reel or TV link
    #[command(
        description = "Download media from an Instagram link.",
        parse_with = first_argument
    )]
    Download(String),
}

// Only the first whitespace-separated token counts; the rest is ignored.
fn first_argument(input: String) -> Result<(String,), ParseError> {
    Ok((input
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string(),))
}

/// Reasons a `/download` request ends without media
#[derive(Debug, Error)]
pub enum DownloadError {
    /// No link was given
    #[error("no link given")]
    MissingLink,
    /// The link has no recognisable post shortcode
    #[error("link does not contain a post shortcode")]
    InvalidLink,
    /// Resolving the post failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl DownloadError {
    /// The chat reply for this error.
    #[must_use]
    pub fn user_reply(&self) -> Reply {
        match self {
            Self::MissingLink => Reply::Html(USAGE_MESSAGE.to_string()),
            Self::InvalidLink => Reply::Text(INVALID_LINK_MESSAGE.to_string()),
            Self::Fetch(e) => Reply::Text(failure_message(e)),
        }
    }
}

/// Failure text shown to the user; includes the underlying error message.
#[must_use]
pub fn failure_message(err: &dyn Display) -> String {
    format!("❌ Failed to fetch the media. Is the post public?\n\nError: {err}")
}

/// Welcome text for `/start`, personalised with the caller's first name.
///
/// # Examples
///
/// ```
/// use reelgrab_transport_telegram::bot::handlers::welcome_message;
/// assert!(welcome_message(Some("Ada")).starts_with("👋 Hi Ada!"));
/// assert!(welcome_message(None).starts_with("👋 Hi there!"));
/// ```
#[must_use]
pub fn welcome_message(first_name: Option<&str>) -> String {
    let name = first_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("there");
    let name = html_escape::encode_text(name);

    format!(
        "👋 Hi {name}!\n\n\
         📥 To download an Instagram video, follow these steps:\n\n\
         1️⃣ Copy the Instagram video URL\n\
         2️⃣ Paste it here using the /download command like this:\n\
         <code>/download https://www.instagram.com/reels/xyz/</code>\n\n\
         ⚠️ Only public posts are supported."
    )
}

/// Resolve a link to the media it points at.
///
/// The resolver is only consulted when the link carries a shortcode.
///
/// # Errors
///
/// Returns `DownloadError::MissingLink` for an empty link,
/// `DownloadError::InvalidLink` when no shortcode can be extracted and
/// `DownloadError::Fetch` when resolution fails.
pub async fn resolve_link(link: &str, resolver: &dyn PostResolver) -> Result<Media, DownloadError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(DownloadError::MissingLink);
    }
    let shortcode = extract_shortcode(link).ok_or(DownloadError::InvalidLink)?;
    let post = resolver.resolve(shortcode).await?;
    Ok(post.media()?)
}

/// Decide the reply for a `/download` request.
///
/// Fetch failures are logged and turned into a failure text; they never escape.
pub async fn plan_download(link: &str, resolver: &dyn PostResolver) -> Reply {
    match resolve_link(link, resolver).await {
        Ok(media) => Reply::from(media),
        Err(e) => {
            if let DownloadError::Fetch(ref fetch_err) = e {
                error!("Error downloading post: {fetch_err}");
            }
            e.user_reply()
        }
    }
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);

    info!("User {user_id} ({user_name}) initiated /start command.");

    let first_name = msg.from.as_ref().map(|u| u.first_name.as_str());
    bot.send_message(msg.chat.id, welcome_message(first_name))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// Download handler
///
/// # Errors
///
/// Returns an error if no reply at all could be sent.
pub async fn download(
    bot: Bot,
    msg: Message,
    link: String,
    resolver: Arc<dyn PostResolver>,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);

    info!("User {user_id} ({user_name}) requested download of '{link}'.");

    let reply = plan_download(&link, resolver.as_ref()).await;
    deliver_reply(&bot, msg.chat.id, user_id, reply).await
}

/// Send a planned reply, falling back to the failure text when Telegram
/// rejects a media reply.
///
/// # Errors
///
/// Returns an error if no reply at all could be sent.
pub async fn deliver_reply(bot: &Bot, chat_id: ChatId, user_id: i64, reply: Reply) -> Result<()> {
    if !reply.is_media() {
        send_reply(bot, chat_id, reply).await?;
        return Ok(());
    }

    // Telegram fetches the media itself and may reject the URL
    if let Err(e) = send_reply(bot, chat_id, reply).await {
        error!("Error sending media to user {user_id}: {e}");
        bot.send_message(chat_id, failure_message(&e)).await?;
    } else {
        info!("Media delivered to user {user_id}.");
    }

    Ok(())
}
