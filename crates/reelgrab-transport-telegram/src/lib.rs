#![deny(missing_docs)]
//! Telegram transport adapter for reelgrab.

/// Telegram-specific command handlers and reply delivery.
pub mod bot;
/// Telegram transport configuration.
pub mod config;
/// Telegram runtime entrypoint.
pub mod runner;
