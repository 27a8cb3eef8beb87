//! The configuration record and its defaults.

use crate::OptionsMap;
use pubcid_types::{DEFAULT_COOKIE_NAME, MAX_AGE_LIMIT_DAYS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const CFG_VERSION: &str = "version";
pub const CFG_COOKIE_NAME: &str = "cookie_name";
pub const CFG_MAX_AGE: &str = "max_age";
pub const CFG_COOKIE_DOMAIN: &str = "cookie_domain";
pub const CFG_CONSENT_FUNC: &str = "consent_func";
pub const CFG_GEN_FUNC: &str = "gen_func";

/// Schema version stamped into the options document.
pub const SETTINGS_VERSION: &str = "1.0.0";

/// Identifier cookie lifetime used when none has been configured.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 365;

const ALL_KEYS: [&str; 6] = [
    CFG_VERSION,
    CFG_COOKIE_NAME,
    CFG_MAX_AGE,
    CFG_COOKIE_DOMAIN,
    CFG_CONSENT_FUNC,
    CFG_GEN_FUNC,
];

/// Cookie manager configuration.
///
/// Every field is always populated: values missing from the options
/// document are backfilled from [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Options document schema version.
    pub version: String,
    /// Identifier cookie name. Empty disables all cookie logic.
    pub cookie_name: String,
    /// Identifier cookie lifetime in days, within `[0, 395]`.
    pub max_age: i64,
    /// Cookie domain. Empty means the request host.
    pub cookie_domain: String,
    /// Name of the consent check to consult. Empty means consent is granted.
    pub consent_func: String,
    /// Name of the identifier generator. Empty disables generation.
    pub gen_func: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            max_age: DEFAULT_MAX_AGE_DAYS,
            cookie_domain: String::new(),
            consent_func: String::new(),
            gen_func: String::new(),
        }
    }
}

impl Settings {
    /// Clamps a max age in days to `[0, 395]`.
    #[must_use]
    pub fn clamp_max_age(days: i64) -> i64 {
        days.clamp(0, MAX_AGE_LIMIT_DAYS)
    }

    /// Returns true when the cookie manager has a cookie name to work with.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.cookie_name.is_empty()
    }

    /// Builds settings from a stored options document.
    ///
    /// Missing keys take their default. Values of the wrong type are replaced
    /// by the default as well, except numeric strings for `max_age`, which
    /// are accepted. `max_age` is clamped.
    #[must_use]
    pub fn from_options(options: &OptionsMap) -> Self {
        let defaults = Self::default();
        Self {
            version: read_string(options, CFG_VERSION, defaults.version),
            cookie_name: read_string(options, CFG_COOKIE_NAME, defaults.cookie_name),
            max_age: Self::clamp_max_age(read_days(options, defaults.max_age)),
            cookie_domain: read_string(options, CFG_COOKIE_DOMAIN, defaults.cookie_domain),
            consent_func: read_string(options, CFG_CONSENT_FUNC, defaults.consent_func),
            gen_func: read_string(options, CFG_GEN_FUNC, defaults.gen_func),
        }
    }

    /// Merges these settings over an existing options document, keeping any
    /// keys this crate does not know about.
    #[must_use]
    pub fn merge_into(&self, mut options: OptionsMap) -> OptionsMap {
        options.insert(CFG_VERSION.into(), Value::from(self.version.clone()));
        options.insert(CFG_COOKIE_NAME.into(), Value::from(self.cookie_name.clone()));
        options.insert(CFG_MAX_AGE.into(), Value::from(self.max_age));
        options.insert(CFG_COOKIE_DOMAIN.into(), Value::from(self.cookie_domain.clone()));
        options.insert(CFG_CONSENT_FUNC.into(), Value::from(self.consent_func.clone()));
        options.insert(CFG_GEN_FUNC.into(), Value::from(self.gen_func.clone()));
        options
    }

    /// Returns true when the stored document lacks any of the known keys.
    #[must_use]
    pub fn needs_migration(options: &OptionsMap) -> bool {
        options.is_empty() || ALL_KEYS.iter().any(|key| !options.contains_key(*key))
    }

    /// Fills in missing keys with defaults, leaving present keys untouched.
    #[must_use]
    pub fn backfill(options: &OptionsMap) -> OptionsMap {
        let mut merged = Self::default().merge_into(OptionsMap::new());
        for (key, value) in options {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

fn read_string(options: &OptionsMap, key: &str, default: String) -> String {
    match options.get(key) {
        None => default,
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) => String::new(),
        Some(other) => {
            warn!(key, value = %other, "Ignoring non-string option value");
            default
        }
    }
}

fn read_days(options: &OptionsMap, default: i64) -> i64 {
    match options.get(CFG_MAX_AGE) {
        None => default,
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
            warn!(value = %s, "Ignoring non-numeric max_age");
            default
        }),
        Some(other) => {
            warn!(value = %other, "Ignoring non-numeric max_age");
            default
        }
    }
}
