//! Configuration store for the Publisher Common ID cookie manager.
//!
//! The host platform owns persistence; this crate sees it through the
//! [`OptionStore`] trait as a single JSON options document. On top of it:
//! - [`Settings`]: the fixed-shape configuration record with defaults
//! - [`SettingsStore`]: load with a one-time migration merge, save from a form
//! - [`SettingsForm`]: submitted settings, sanitized and clamped before saving
//! - [`SettingsNotice`]: advisory problems shown alongside the settings
//!
//! # Options document
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "cookie_name": "_pubcid",
//!   "max_age": 365,
//!   "cookie_domain": "",
//!   "consent_func": "",
//!   "gen_func": ""
//! }
//! ```

mod form;
mod notice;
mod settings;
mod store;

pub use form::SettingsForm;
pub use notice::SettingsNotice;
pub use settings::{
    Settings, CFG_CONSENT_FUNC, CFG_COOKIE_DOMAIN, CFG_COOKIE_NAME, CFG_GEN_FUNC, CFG_MAX_AGE,
    CFG_VERSION, DEFAULT_MAX_AGE_DAYS, SETTINGS_VERSION,
};
pub use store::{JsonFileOptionStore, MemoryOptionStore, OptionStore, SettingsStore};

/// The options document as persisted by an [`OptionStore`].
pub type OptionsMap = serde_json::Map<String, serde_json::Value>;
