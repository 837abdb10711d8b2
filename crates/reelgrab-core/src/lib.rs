#![deny(missing_docs)]
//! Reelgrab core library.
//!
//! Shortcode extraction, Instagram media resolution and shared configuration.

/// Configuration management.
pub mod config;
/// Media resolution for post shortcodes.
pub mod fetch;
/// Shortcode extraction from post links.
pub mod shortcode;
