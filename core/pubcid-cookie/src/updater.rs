//! The identifier cookie decision.

use crate::config::CookieConfig;
use crate::header::set_cookie_header;
use crate::request::RequestCookies;
use chrono::{DateTime, Utc};
use http::header::SET_COOKIE;
use http::HeaderMap;
use pubcid_types::{sanitize_text_field, CookieAction, Result};
use tracing::debug;

/// Decides what happens to the identifier cookie on a request.
#[derive(Debug, Clone)]
pub struct CookieUpdater {
    config: CookieConfig,
}

impl CookieUpdater {
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CookieConfig {
        &self.config
    }

    /// Computes the cookie action for a request.
    ///
    /// A cookie that is present but sanitizes to an empty string still
    /// counts as existing for deletion, but is not worth refreshing: the
    /// generator gets a chance to replace it.
    #[must_use]
    pub fn decide(&self, cookies: &RequestCookies) -> CookieAction {
        let config = &self.config;
        if !config.is_enabled() {
            return CookieAction::NoOp;
        }

        let existing = cookies.get(&config.cookie_name).map(sanitize_text_field);

        if let Some(consent) = &config.consent {
            if !consent.has_consent(cookies) {
                debug!(cookie = %config.cookie_name, "No consent for identifier cookie");
                return match existing {
                    Some(_) => CookieAction::Delete {
                        domain: config.cookie_domain.clone(),
                    },
                    None => CookieAction::NoOp,
                };
            }
        }

        let value = match existing.filter(|v| !v.is_empty()) {
            Some(value) => Some(value),
            None => config
                .generator
                .as_ref()
                .map(|generator| sanitize_text_field(&generator.generate()))
                .filter(|v| !v.is_empty()),
        };

        match value {
            Some(value) => CookieAction::Set {
                value,
                max_age: config.max_age_secs(),
                domain: config.cookie_domain.clone(),
            },
            None => CookieAction::NoOp,
        }
    }

    /// Computes the cookie action and appends the matching `Set-Cookie`
    /// header to `response`, if any.
    pub fn apply(
        &self,
        cookies: &RequestCookies,
        response: &mut HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<CookieAction> {
        let action = self.decide(cookies);
        if let Some(header) = set_cookie_header(&self.config.cookie_name, &action, now)? {
            debug!(cookie = %self.config.cookie_name, ?action, "Updating identifier cookie");
            response.append(SET_COOKIE, header);
        }
        Ok(action)
    }
}
