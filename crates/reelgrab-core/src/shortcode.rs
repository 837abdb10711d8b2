//! Shortcode extraction from Instagram post links.
//!
//! Recognised path shapes are `/p/`, `/reels/`, `/reel/` and `/tv/`, each
//! followed by the shortcode segment. Anything after the segment (a slash,
//! a query string) is ignored.

use lazy_regex::lazy_regex;

static SHORTCODE_PATTERN: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"instagram\.com/(?:p|reels|reel|tv)/([A-Za-z0-9_-]+)");

/// Extracts the post shortcode from an Instagram link.
///
/// Returns `None` when the link does not contain one of the known post shapes.
///
/// # Examples
///
/// ```
/// use reelgrab_core::shortcode::extract_shortcode;
///
/// assert_eq!(
///     extract_shortcode("https://www.instagram.com/p/Cr9-ZxGJHGx/?utm_source=ig_web_copy_link"),
///     Some("Cr9-ZxGJHGx")
/// );
/// assert_eq!(extract_shortcode("https://www.instagram.com/explore/"), None);
/// ```
#[must_use]
pub fn extract_shortcode(link: &str) -> Option<&str> {
    SHORTCODE_PATTERN
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
