//! Shared server state.

use pubcid_cookie::{Capabilities, CookieConfig, CookieUpdater, DEFAULT_PIXEL_MAX_AGE_DAYS};
use pubcid_settings::{OptionStore, Settings, SettingsForm, SettingsNotice, SettingsStore};
use pubcid_types::Result;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Route prefix used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "pubcid/v1";

/// Deployment-wide constants, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Update the cookie on every request passing through the router,
    /// not only on pixel calls.
    pub all_pages: bool,
    /// Browser cache lifetime of the pixel, in days.
    pub pixel_max_age_days: u64,
    /// Route prefix, e.g. `pubcid/v1`.
    pub namespace: String,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            all_pages: false,
            pixel_max_age_days: DEFAULT_PIXEL_MAX_AGE_DAYS,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl Deployment {
    /// Builds a route path under the namespace, e.g. `/pubcid/v1/extend`.
    #[must_use]
    pub fn route(&self, leaf: &str) -> String {
        let namespace = self.namespace.trim_matches('/');
        if namespace.is_empty() {
            format!("/{leaf}")
        } else {
            format!("/{namespace}/{leaf}")
        }
    }
}

/// Settings, resolved cookie configuration and deployment constants shared
/// by all handlers.
///
/// Settings are read-mostly: they are resolved once at startup and again
/// after every save through the admin router.
pub struct AppState {
    store: SettingsStore<Arc<dyn OptionStore>>,
    capabilities: Capabilities,
    current: RwLock<(Settings, CookieConfig)>,
    deployment: Deployment,
}

impl AppState {
    /// Loads the settings (writing defaults on first use) and resolves them.
    pub fn new(
        store: Arc<dyn OptionStore>,
        capabilities: Capabilities,
        deployment: Deployment,
    ) -> Self {
        let store = SettingsStore::new(store);
        let settings = store.ensure_defaults();
        let config = CookieConfig::resolve(&settings, &capabilities);
        info!(
            cookie_name = %settings.cookie_name,
            max_age = settings.max_age,
            all_pages = deployment.all_pages,
            "Cookie settings loaded"
        );

        Self {
            store,
            capabilities,
            current: RwLock::new((settings, config)),
            deployment,
        }
    }

    #[must_use]
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The settings currently in effect.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .0
            .clone()
    }

    /// A cookie updater for the settings currently in effect.
    #[must_use]
    pub fn updater(&self) -> CookieUpdater {
        let config = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .1
            .clone();
        CookieUpdater::new(config)
    }

    /// Advisory notices for the settings currently in effect.
    #[must_use]
    pub fn notices(&self) -> Vec<SettingsNotice> {
        self.settings()
            .notices(|name| self.capabilities.has_consent_check(name))
    }

    /// Saves a settings submission and switches to the result.
    pub fn save(&self, form: SettingsForm) -> Result<Settings> {
        let saved = self.store.save_form(form)?;
        self.install(saved.clone());
        Ok(saved)
    }

    fn install(&self, settings: Settings) {
        let config = CookieConfig::resolve(&settings, &self.capabilities);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = (settings, config);
    }
}
