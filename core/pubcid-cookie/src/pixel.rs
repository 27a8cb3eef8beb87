//! The 1x1 transparent GIF served by the extend endpoint.

use crate::header::format_http_date;
use crate::request::RequestCookies;
use chrono::{DateTime, Duration, Utc};
use http::header::{CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, EXPIRES, PRAGMA};
use http::{HeaderMap, HeaderValue};
use pubcid_types::{CookieAction, Error, Result, DAY_IN_SECONDS};

/// Browser cache lifetime of the pixel, in days, when the visitor already
/// carries the identifier cookie.
pub const DEFAULT_PIXEL_MAX_AGE_DAYS: u64 = 1;

/// A single transparent pixel. Byte-for-byte stable so CDNs comparing
/// content hashes keep treating it as the same object.
pub const PIXEL_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x90, 0x00, 0x00, 0xff, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x05, 0x10, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x04, 0x01, 0x00, 0x3b,
];

/// Whether the browser holds the identifier cookie once the response
/// carrying `action` has been applied.
#[must_use]
pub fn cookie_present_after(action: &CookieAction, cookies: &RequestCookies, name: &str) -> bool {
    match action {
        CookieAction::Set { .. } => true,
        CookieAction::Delete { .. } => false,
        CookieAction::NoOp => !name.is_empty() && cookies.contains(name),
    }
}

/// Headers and body of a pixel response.
#[derive(Debug, Clone)]
pub struct PixelResponse {
    pub headers: HeaderMap,
    pub body: &'static [u8],
}

impl PixelResponse {
    /// Builds the pixel response.
    ///
    /// Visitors holding the identifier get a privately cacheable pixel so
    /// the browser does not call back for `pixel_max_age_days`; everyone
    /// else gets an uncacheable one so the next page view retries.
    pub fn build(cookie_present: bool, pixel_max_age_days: u64, now: DateTime<Utc>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("none"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/gif"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(PIXEL_GIF.len()));

        if cookie_present {
            let max_age = pixel_max_age_days.saturating_mul(DAY_IN_SECONDS);
            let expires = i64::try_from(max_age)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);

            headers.insert(CACHE_CONTROL, header_value(format!("private, max-age={max_age}"))?);
            headers.insert(EXPIRES, header_value(format_http_date(expires))?);
        } else {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        }

        Ok(Self {
            headers,
            body: &PIXEL_GIF,
        })
    }
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(|e| Error::InvalidHeader(e.to_string()))
}
