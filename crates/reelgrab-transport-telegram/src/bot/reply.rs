//! Outgoing replies.
//!
//! Handlers decide *what* to answer as a [`Reply`]; [`send_reply`] turns it into
//! the matching Bot API call. Keeping the two apart lets the decision be tested
//! without a live bot.

use reelgrab_core::fetch::{Media, Url};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, Message, ParseMode};
use tracing::debug;

/// A reply to send back to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text.
    Text(String),
    /// Text with HTML markup.
    Html(String),
    /// A photo sent by URL.
    Photo(Url),
    /// A video sent by URL.
    Video(Url),
}

impl Reply {
    /// Whether this reply carries media rather than text.
    #[must_use]
    pub const fn is_media(&self) -> bool {
        matches!(self, Self::Photo(_) | Self::Video(_))
    }

    /// Text content of a text reply.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Html(text) => Some(text),
            Self::Photo(_) | Self::Video(_) => None,
        }
    }
}

impl From<Media> for Reply {
    fn from(media: Media) -> Self {
        match media {
            Media::Video(url) => Self::Video(url),
            Media::Photo(url) => Self::Photo(url),
        }
    }
}

/// Send a reply to a chat.
///
/// Media is passed to Telegram by URL; Telegram downloads it itself.
///
/// # Errors
///
/// Returns the Bot API error if the request fails.
pub async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: Reply,
) -> Result<Message, teloxide::RequestError> {
    match reply {
        Reply::Text(text) => bot.send_message(chat_id, text).await,
        Reply::Html(text) => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Html)
                .await
        }
        Reply::Photo(url) => {
            debug!("Sending photo {url} to chat {}", chat_id.0);
            bot.send_photo(chat_id, InputFile::url(url)).await
        }
        Reply::Video(url) => {
            debug!("Sending video {url} to chat {}", chat_id.0);
            bot.send_video(chat_id, InputFile::url(url)).await
        }
    }
}
