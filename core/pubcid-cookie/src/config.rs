//! Settings resolved into a ready-to-use cookie configuration.

use crate::capability::{Capabilities, ConsentChecker, IdentifierGenerator};
use pubcid_settings::Settings;
use pubcid_types::DAY_IN_SECONDS;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Everything the cookie updater needs, with consent and generator
/// references already resolved.
#[derive(Clone)]
pub struct CookieConfig {
    pub cookie_name: String,
    /// Identifier cookie lifetime in days, within `[0, 395]`.
    pub max_age_days: i64,
    /// Empty means a host-only cookie.
    pub cookie_domain: String,
    pub consent: Option<Arc<dyn ConsentChecker>>,
    pub generator: Option<Arc<dyn IdentifierGenerator>>,
}

impl CookieConfig {
    /// Creates a configuration without consent check or generator.
    pub fn new(cookie_name: impl Into<String>, max_age_days: i64, cookie_domain: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            max_age_days: Settings::clamp_max_age(max_age_days),
            cookie_domain: cookie_domain.into(),
            consent: None,
            generator: None,
        }
    }

    #[must_use]
    pub fn with_consent(mut self, checker: impl ConsentChecker + 'static) -> Self {
        self.consent = Some(Arc::new(checker));
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: impl IdentifierGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Resolves stored settings against the registered capabilities.
    ///
    /// Names that cannot be resolved are dropped with a warning; the cookie
    /// logic then behaves as if they were never configured.
    pub fn resolve(settings: &Settings, capabilities: &Capabilities) -> Self {
        let consent = match settings.consent_func.as_str() {
            "" => None,
            name => {
                let found = capabilities.consent(name);
                if found.is_none() {
                    warn!(consent_func = name, "Consent function not found, treating consent as granted");
                }
                found
            }
        };

        let generator = match settings.gen_func.as_str() {
            "" => None,
            name => {
                let found = capabilities.generator(name);
                if found.is_none() {
                    warn!(gen_func = name, "Generator function not found, identifiers will not be generated");
                }
                found
            }
        };

        Self {
            cookie_name: settings.cookie_name.clone(),
            max_age_days: Settings::clamp_max_age(settings.max_age),
            cookie_domain: settings.cookie_domain.clone(),
            consent,
            generator,
        }
    }

    /// Identifier cookie lifetime in seconds.
    #[must_use]
    pub fn max_age_secs(&self) -> u64 {
        self.max_age_days.max(0) as u64 * DAY_IN_SECONDS
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.cookie_name.is_empty()
    }
}

impl fmt::Debug for CookieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieConfig")
            .field("cookie_name", &self.cookie_name)
            .field("max_age_days", &self.max_age_days)
            .field("cookie_domain", &self.cookie_domain)
            .field("consent", &self.consent.is_some())
            .field("generator", &self.generator.is_some())
            .finish()
    }
}
