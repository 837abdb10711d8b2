//! Media resolution for Instagram posts.
//!
//! [`PostResolver`] is the seam between command handlers and the network:
//! handlers receive it as `Arc<dyn PostResolver>` and never talk to
//! Instagram directly. [`InstagramClient`] is the production implementation.

mod instagram;

pub use instagram::InstagramClient;
pub use url::Url;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while resolving a post
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure talking to Instagram
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    /// The post does not exist
    #[error("Post {0} not found")]
    NotFound(String),
    /// Instagram refused anonymous access (private post or login wall)
    #[error("Login required to access post {0}")]
    LoginRequired(String),
    /// Instagram answered with an unexpected status or error payload
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error details, truncated
        message: String,
    },
    /// Instagram answered 200 but reported a failure in the payload
    #[error("Instagram rejected the request: {0}")]
    Rejected(String),
    /// The response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Instagram returned no metadata for the post
    #[error("Fetching metadata for post {0} failed")]
    Unavailable(String),
    /// A video post came without a video URL
    #[error("Post {0} is a video but has no video URL")]
    MissingVideoUrl(String),
    /// A media URL in the response could not be parsed
    #[error("Invalid media URL '{url}': {source}")]
    InvalidMediaUrl {
        /// The rejected URL
        url: String,
        /// Parser error
        source: url::ParseError,
    },
    /// Client construction failed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Metadata of a resolved post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPost {
    /// Shortcode the post was resolved from
    pub shortcode: String,
    /// Whether the post is a video
    pub is_video: bool,
    /// Direct video URL, present for video posts
    pub video_url: Option<Url>,
    /// Display (photo) URL
    pub url: Url,
}

/// Media to relay back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    /// A video to send by URL
    Video(Url),
    /// A photo to send by URL
    Photo(Url),
}

impl MediaPost {
    /// Picks the media to send: the video for video posts, the display image otherwise.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MissingVideoUrl` for a video post without a video URL.
    pub fn media(&self) -> Result<Media, FetchError> {
        if self.is_video {
            self.video_url
                .clone()
                .map(Media::Video)
                .ok_or_else(|| FetchError::MissingVideoUrl(self.shortcode.clone()))
        } else {
            Ok(Media::Photo(self.url.clone()))
        }
    }
}

/// Interface for post resolvers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostResolver: Send + Sync {
    /// Resolve a post by its shortcode
    async fn resolve(&self, shortcode: &str) -> Result<MediaPost, FetchError>;
}
