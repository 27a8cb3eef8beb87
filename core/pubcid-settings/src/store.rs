//! Option persistence and the settings store built on it.

use crate::form::SettingsForm;
use crate::settings::Settings;
use crate::OptionsMap;
use pubcid_types::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Key/value persistence owned by the host platform.
///
/// The whole options document is loaded and saved at once.
pub trait OptionStore: Send + Sync {
    /// Returns the stored document, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<OptionsMap>>;

    /// Replaces the stored document.
    fn save(&self, options: &OptionsMap) -> Result<()>;
}

impl<T: OptionStore + ?Sized> OptionStore for Arc<T> {
    fn load(&self) -> Result<Option<OptionsMap>> {
        (**self).load()
    }

    fn save(&self, options: &OptionsMap) -> Result<()> {
        (**self).save(options)
    }
}

/// In-process option store, mainly for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    options: Mutex<Option<OptionsMap>>,
    writes: Mutex<usize>,
}

impl MemoryOptionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a document.
    #[must_use]
    pub fn with_options(options: OptionsMap) -> Self {
        Self {
            options: Mutex::new(Some(options)),
            writes: Mutex::new(0),
        }
    }

    /// Returns a copy of the stored document.
    #[must_use]
    pub fn snapshot(&self) -> Option<OptionsMap> {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times the document has been saved.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OptionStore for MemoryOptionStore {
    fn load(&self) -> Result<Option<OptionsMap>> {
        Ok(self.snapshot())
    }

    fn save(&self, options: &OptionsMap) -> Result<()> {
        *self.options.lock().unwrap_or_else(PoisonError::into_inner) = Some(options.clone());
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Option store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileOptionStore {
    path: PathBuf,
}

impl JsonFileOptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the options file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OptionStore for JsonFileOptionStore {
    fn load(&self) -> Result<Option<OptionsMap>> {
        if !self.path.exists() {
            debug!("No options file at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let document: serde_json::Value = serde_json::from_str(&contents)?;
        match document {
            serde_json::Value::Object(map) => Ok(Some(map)),
            other => Err(Error::InvalidOptions(format!(
                "expected a JSON object in {:?}, found {}",
                self.path, other
            ))),
        }
    }

    fn save(&self, options: &OptionsMap) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling file first so readers never see a partial document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(options)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Reads and writes [`Settings`] through an [`OptionStore`].
pub struct SettingsStore<S: OptionStore> {
    store: S,
}

impl<S: OptionStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying option store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Loads the current settings, backfilling defaults.
    ///
    /// If the stored document is empty or missing any known key, the merged
    /// document is written back once. Storage failures degrade to defaults.
    pub fn current(&self) -> Settings {
        let stored = match self.store.load() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to load options, using defaults: {}", e);
                return Settings::default();
            }
        };

        if Settings::needs_migration(&stored) {
            let merged = Settings::backfill(&stored);
            match self.store.save(&merged) {
                Ok(()) => info!("Options migrated to settings version {}", crate::SETTINGS_VERSION),
                Err(e) => warn!("Failed to write migrated options: {}", e),
            }
            return Settings::from_options(&merged);
        }

        Settings::from_options(&stored)
    }

    /// Materialises the default settings in the store if they are missing.
    pub fn ensure_defaults(&self) -> Settings {
        self.current()
    }

    /// Sanitizes a form submission, applies it over the current settings
    /// and persists the result.
    pub fn save_form(&self, form: SettingsForm) -> Result<Settings> {
        let form = form.sanitized();
        let current = self.current();
        let next = form.apply_to(&current);

        let stored = self.store.load()?.unwrap_or_default();
        self.store.save(&next.merge_into(stored))?;

        info!(
            cookie_name = %next.cookie_name,
            max_age = next.max_age,
            "Settings saved"
        );
        Ok(next)
    }
}
