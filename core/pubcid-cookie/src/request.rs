//! Cookies sent by the browser.

use http::header::COOKIE;
use http::HeaderMap;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// The cookies of one incoming request, percent-decoded.
///
/// When a name appears more than once the first occurrence wins. A pair
/// without `=` is a cookie with an empty value, and octets that do not
/// decode to UTF-8 are replaced rather than dropping the cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    values: HashMap<String, String>,
}

impl RequestCookies {
    /// Parses every `Cookie` header of a request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = Self::default();
        for header in headers.get_all(COOKIE) {
            if let Ok(raw) = header.to_str() {
                cookies.extend_from_str(raw);
            }
        }
        cookies
    }

    /// Parses a single `Cookie` header value.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut cookies = Self::default();
        cookies.extend_from_str(header);
        cookies
    }

    fn extend_from_str(&mut self, raw: &str) {
        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = decode(name.trim());
            if name.is_empty() {
                continue;
            }
            self.values
                .entry(name)
                .or_insert_with(|| decode(value.trim()));
        }
    }

    /// Returns the raw (unsanitized) value of a cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Adds a cookie, keeping an existing value for the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(name.into()).or_insert_with(|| value.into());
        self
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
