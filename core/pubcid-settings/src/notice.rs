//! Advisory messages shown next to the settings.

use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// A problem with the saved settings. Notices never block a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsNotice {
    /// Settings key the notice refers to.
    pub field: String,
    pub message: String,
}

impl Settings {
    /// Flags settings that will not behave as the administrator expects.
    ///
    /// `consent_resolvable` reports whether a consent check name can be
    /// resolved by the running process.
    pub fn notices(&self, consent_resolvable: impl Fn(&str) -> bool) -> Vec<SettingsNotice> {
        let mut notices = Vec::new();

        if self.cookie_name == "bogus" {
            notices.push(SettingsNotice {
                field: crate::CFG_COOKIE_NAME.to_string(),
                message: "Bad cookie name".to_string(),
            });
        }

        if !self.consent_func.is_empty() && !consent_resolvable(&self.consent_func) {
            notices.push(SettingsNotice {
                field: crate::CFG_CONSENT_FUNC.to_string(),
                message: format!("Function {} not found", self.consent_func),
            });
        }

        notices
    }
}
