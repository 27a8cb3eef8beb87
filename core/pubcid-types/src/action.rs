//! The outcome of a cookie update decision.

use serde::{Deserialize, Serialize};

/// What the cookie updater decided to do with the identifier cookie.
///
/// At most one cookie mutation is emitted per request, so the variants are
/// mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CookieAction {
    /// Leave the cookie untouched.
    #[default]
    NoOp,
    /// Expire the cookie immediately.
    Delete {
        /// Domain the cookie was written with (empty = host-only).
        domain: String,
    },
    /// Write the cookie with a fresh expiry.
    Set {
        /// Sanitized identifier value.
        value: String,
        /// Lifetime in seconds.
        max_age: u64,
        /// Cookie domain (empty = host-only).
        domain: String,
    },
}

impl CookieAction {
    /// Returns true when the action leaves an identifier in the browser.
    #[must_use]
    pub fn sets_cookie(&self) -> bool {
        matches!(self, Self::Set { .. })
    }

    /// Returns true for [`CookieAction::NoOp`].
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// The value being written, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Set { value, .. } => Some(value),
            _ => None,
        }
    }
}
