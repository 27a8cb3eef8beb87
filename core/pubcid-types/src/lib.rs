//! Shared primitives for the Publisher Common ID cookie manager.
//!
//! This crate defines the small, dependency-light pieces used by both the
//! settings layer and the cookie engine:
//! - The text sanitizer applied to cookie values and submitted settings
//! - The cookie action produced by a cookie update decision
//! - Time and range constants shared across crates

mod action;
mod sanitize;

pub use action::CookieAction;
pub use sanitize::sanitize_text_field;

/// Seconds in one day.
pub const DAY_IN_SECONDS: u64 = 86_400;

/// Upper bound for the identifier cookie's max age, in days.
pub const MAX_AGE_LIMIT_DAYS: i64 = 395;

/// Cookie name used when none has been configured.
pub const DEFAULT_COOKIE_NAME: &str = "_pubcid";

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the fallible edges of the system (option storage,
/// header construction). The cookie decision itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("invalid options document: {0}")]
    InvalidOptions(String),
}
