//! Alert rendering and delivery.
//!
//! This crate provides:
//! - Channel-specific message formatting (plain text and HTML)
//! - Fixed-window rate limiting per channel
//! - Failure-isolated dispatch to Twitter and Telegram

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod format;
pub mod limiter;
pub mod telegram;
pub mod twitter;

pub use channel::{Channel, ChannelError};
pub use config::RateLimitConfig;
pub use dispatcher::{ChannelDispatcher, DispatchReport, RateLimitedChannel};
pub use format::{bold_digits, group_thousands, unbold_digits, AlertFormatter, MessageFormat};
pub use limiter::FixedWindowLimiter;
pub use telegram::TelegramChannel;
pub use twitter::TwitterChannel;
