//! Identifier cookie engine and tracking pixel for Publisher Common ID.
//!
//! This crate handles:
//! - Reading the identifier cookie from incoming `Cookie` headers
//! - Deciding whether to refresh, generate, delete or ignore it
//! - Rendering the resulting `Set-Cookie` header
//! - Building the cacheable 1x1 GIF pixel response
//!
//! # Decision order
//!
//! 1. An empty cookie name disables everything.
//! 2. A configured consent check that says no deletes an existing cookie
//!    and never reaches the generator.
//! 3. Without an existing cookie, a configured generator supplies a value.
//! 4. Any available value is written back with a fresh expiry.
//!
//! Consent checks and generators are injected as [`ConsentChecker`] and
//! [`IdentifierGenerator`] implementations and looked up by the names
//! stored in the settings through [`Capabilities`].

mod capability;
mod config;
mod header;
mod pixel;
mod request;
mod updater;

pub use capability::{
    Capabilities, ConsentChecker, IdentifierGenerator, COOKIE_NOTICE_ACCEPTED,
    COOKIE_NOTICE_CONSENT, UUID4_GENERATOR, UUID4_GENERATOR_ALIAS,
};
pub use config::CookieConfig;
pub use header::{format_http_date, set_cookie_header};
pub use pixel::{cookie_present_after, PixelResponse, DEFAULT_PIXEL_MAX_AGE_DAYS, PIXEL_GIF};
pub use request::RequestCookies;
pub use updater::CookieUpdater;

pub use pubcid_types::CookieAction;
