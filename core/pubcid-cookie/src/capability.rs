//! Injected consent checks and identifier generators.

use crate::request::RequestCookies;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Name of the built-in UUID v4 generator.
pub const UUID4_GENERATOR: &str = "wp_generate_uuid4";
/// Short alias for [`UUID4_GENERATOR`].
pub const UUID4_GENERATOR_ALIAS: &str = "uuid4";
/// Name of the built-in cookie-notice consent check.
pub const COOKIE_NOTICE_CONSENT: &str = "cn_cookies_accepted";
/// Cookie set by cookie-notice banners once the visitor accepts.
pub const COOKIE_NOTICE_ACCEPTED: &str = "cookie_notice_accepted";

/// Decides whether the visitor consented to the identifier cookie.
pub trait ConsentChecker: Send + Sync {
    fn has_consent(&self, cookies: &RequestCookies) -> bool;
}

impl<F> ConsentChecker for F
where
    F: Fn(&RequestCookies) -> bool + Send + Sync,
{
    fn has_consent(&self, cookies: &RequestCookies) -> bool {
        self(cookies)
    }
}

/// Produces a fresh identifier value.
pub trait IdentifierGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> IdentifierGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Named consent checks and generators available to the settings.
///
/// Settings refer to these by name; a name with no registration resolves
/// to nothing and the cookie logic behaves as if it was never configured.
#[derive(Clone, Default)]
pub struct Capabilities {
    consent: HashMap<String, Arc<dyn ConsentChecker>>,
    generators: HashMap<String, Arc<dyn IdentifierGenerator>>,
}

impl Capabilities {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in checks and generators:
    /// - `wp_generate_uuid4` / `uuid4`: random UUID v4
    /// - `cn_cookies_accepted`: `cookie_notice_accepted=true` is present
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut caps = Self::new();
        let uuid4: Arc<dyn IdentifierGenerator> = Arc::new(|| Uuid::new_v4().to_string());
        caps.generators.insert(UUID4_GENERATOR.to_string(), Arc::clone(&uuid4));
        caps.generators.insert(UUID4_GENERATOR_ALIAS.to_string(), uuid4);
        caps.register_consent(COOKIE_NOTICE_CONSENT, |cookies: &RequestCookies| {
            cookies.get(COOKIE_NOTICE_ACCEPTED) == Some("true")
        });
        caps
    }

    /// Registers (or replaces) a consent check under `name`.
    pub fn register_consent(
        &mut self,
        name: impl Into<String>,
        checker: impl ConsentChecker + 'static,
    ) -> &mut Self {
        self.consent.insert(name.into(), Arc::new(checker));
        self
    }

    /// Registers (or replaces) a generator under `name`.
    pub fn register_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl IdentifierGenerator + 'static,
    ) -> &mut Self {
        self.generators.insert(name.into(), Arc::new(generator));
        self
    }

    /// Looks up a consent check. Empty names never resolve.
    #[must_use]
    pub fn consent(&self, name: &str) -> Option<Arc<dyn ConsentChecker>> {
        if name.is_empty() {
            return None;
        }
        self.consent.get(name).cloned()
    }

    /// Looks up a generator. Empty names never resolve.
    #[must_use]
    pub fn generator(&self, name: &str) -> Option<Arc<dyn IdentifierGenerator>> {
        if name.is_empty() {
            return None;
        }
        self.generators.get(name).cloned()
    }

    /// Whether `name` resolves to a registered consent check.
    #[must_use]
    pub fn has_consent_check(&self, name: &str) -> bool {
        self.consent(name).is_some()
    }

    /// Whether `name` resolves to a registered generator.
    #[must_use]
    pub fn has_generator(&self, name: &str) -> bool {
        self.generator(name).is_some()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut consent: Vec<_> = self.consent.keys().collect();
        let mut generators: Vec<_> = self.generators.keys().collect();
        consent.sort();
        generators.sort();
        f.debug_struct("Capabilities")
            .field("consent", &consent)
            .field("generators", &generators)
            .finish()
    }
}
