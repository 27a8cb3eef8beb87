//! `Set-Cookie` rendering.

use chrono::{DateTime, Duration, Utc};
use cookie::Cookie;
use http::HeaderValue;
use pubcid_types::{CookieAction, Error, Result};

/// How far in the past a deleted cookie's expiry is placed.
const DELETE_BACKDATE_SECS: i64 = 3600;

/// Formats a timestamp as an RFC 1123 HTTP date, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
#[must_use]
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Renders the `Set-Cookie` header for an action, or `None` for a no-op.
///
/// ```text
/// _pubcid=abc; expires=<date>; path=/; domain=.example.com; SameSite=Lax
/// _pubcid=; expires=<past date>; Max-Age=0; path=/; domain=.example.com; SameSite=Lax
/// ```
///
/// The name and value are percent-encoded, so a value holding `;`, `,` or
/// whitespace cannot add attributes and reads back unchanged. The `domain`
/// attribute is left out when no domain is configured, which makes the
/// browser scope the cookie to the request host.
pub fn set_cookie_header(
    name: &str,
    action: &CookieAction,
    now: DateTime<Utc>,
) -> Result<Option<HeaderValue>> {
    let rendered = match action {
        CookieAction::NoOp => return Ok(None),
        CookieAction::Set {
            value,
            max_age,
            domain,
        } => {
            let expires = i64::try_from(*max_age)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            format!(
                "{}; expires={}; path=/; {}SameSite=Lax",
                encoded_pair(name, value),
                format_http_date(expires),
                domain_attr(domain)
            )
        }
        CookieAction::Delete { domain } => {
            let expires = Duration::try_seconds(DELETE_BACKDATE_SECS)
                .and_then(|backdate| now.checked_sub_signed(backdate))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            format!(
                "{}; expires={}; Max-Age=0; path=/; {}SameSite=Lax",
                encoded_pair(name, ""),
                format_http_date(expires),
                domain_attr(domain)
            )
        }
    };

    HeaderValue::from_str(&rendered)
        .map(Some)
        .map_err(|e| Error::InvalidHeader(format!("{e}: {rendered}")))
}

fn encoded_pair(name: &str, value: &str) -> String {
    Cookie::new(name, value).encoded().stripped().to_string()
}

fn domain_attr(domain: &str) -> String {
    if domain.is_empty() {
        String::new()
    } else {
        format!("domain={domain}; ")
    }
}
