//! Anonymous Instagram post lookup over the public GraphQL endpoint.

use super::{FetchError, MediaPost, PostResolver, Url};
use crate::config::FetchSettings;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Resolves posts through Instagram's web GraphQL API without logging in.
///
/// One client is built at startup and shared by all handlers.
pub struct InstagramClient {
    http: reqwest::Client,
    endpoint: String,
    doc_id: String,
}

#[derive(Debug, Deserialize)]
struct ShortcodeMediaNode {
    #[serde(default)]
    is_video: bool,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(alias = "display_src")]
    display_url: String,
}

impl InstagramClient {
    /// Build a client from fetch settings.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Config` if a configured header value is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers(settings)?)
            .cookie_store(true);
        if let Some(timeout) = settings.fetch_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        info!(
            "Instagram client initialized (endpoint: {}, timeout: {:?})",
            settings.graphql_endpoint(),
            settings.fetch_timeout()
        );

        Ok(Self {
            http,
            endpoint: settings.graphql_endpoint(),
            doc_id: settings.instagram_doc_id.clone(),
        })
    }

    async fn query_shortcode_media(&self, shortcode: &str) -> Result<Value, FetchError> {
        let variables = json!({ "shortcode": shortcode }).to_string();
        let form = [
            ("variables", variables.as_str()),
            ("doc_id", self.doc_id.as_str()),
            ("server_timestamps", "true"),
        ];

        debug!("Querying post metadata for {shortcode}");
        let response = self.http.post(&self.endpoint).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        check_status(shortcode, status, &body)?;
        parse_body(shortcode, &body)
    }
}

#[async_trait]
impl PostResolver for InstagramClient {
    async fn resolve(&self, shortcode: &str) -> Result<MediaPost, FetchError> {
        let body = self.query_shortcode_media(shortcode).await?;
        parse_shortcode_media(shortcode, &body)
    }
}

fn default_headers(settings: &FetchSettings) -> Result<HeaderMap, FetchError> {
    let origin = settings.instagram_base_url.trim_end_matches('/');
    let pairs = [
        ("user-agent", settings.instagram_user_agent.clone()),
        ("x-ig-app-id", settings.instagram_app_id.clone()),
        ("origin", origin.to_string()),
        ("referer", format!("{origin}/")),
        ("accept-language", "en-US,en;q=0.8".to_string()),
        ("x-requested-with", "XMLHttpRequest".to_string()),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let value = HeaderValue::from_str(&value)
            .map_err(|e| FetchError::Config(format!("Invalid value for header {name}: {e}")))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}

fn is_html(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<!doctype") || trimmed.starts_with("<html")
}

fn check_status(shortcode: &str, status: StatusCode, body: &str) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(shortcode.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(FetchError::LoginRequired(shortcode.to_string()))
        }
        _ => {
            let message = if is_html(body) {
                "server returned HTML error page".to_string()
            } else if body.chars().count() > MAX_ERROR_BODY_CHARS {
                let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
                format!("{truncated}... (truncated)")
            } else {
                body.to_string()
            };
            Err(FetchError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn parse_body(shortcode: &str, body: &str) -> Result<Value, FetchError> {
    // Anonymous requests are sometimes answered with the login page and a 200
    if is_html(body) {
        return Err(FetchError::LoginRequired(shortcode.to_string()));
    }
    Ok(serde_json::from_str(body)?)
}

fn parse_media_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|source| FetchError::InvalidMediaUrl {
        url: raw.to_string(),
        source,
    })
}

fn parse_shortcode_media(shortcode: &str, body: &Value) -> Result<MediaPost, FetchError> {
    if let Some(status) = body.get("status").and_then(Value::as_str) {
        if status != "ok" {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(status)
                .to_string();
            return Err(FetchError::Rejected(message));
        }
    }

    let node = body
        .pointer("/data/xdt_shortcode_media")
        .filter(|node| !node.is_null())
        .ok_or_else(|| FetchError::Unavailable(shortcode.to_string()))?;
    let node: ShortcodeMediaNode = serde_json::from_value(node.clone())?;

    Ok(MediaPost {
        shortcode: shortcode.to_string(),
        is_video: node.is_video,
        video_url: node.video_url.as_deref().map(parse_media_url).transpose()?,
        url: parse_media_url(&node.display_url)?,
    })
}
