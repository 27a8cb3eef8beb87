//! Settings submitted through the administrative form.

use crate::settings::Settings;
use pubcid_types::sanitize_text_field;
use serde::{Deserialize, Deserializer, Serialize};

/// A settings submission. Fields left out keep their current value.
///
/// Text fields are sanitized and `max_age` is clamped to `[0, 395]`
/// instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_func: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gen_func: Option<String>,
}

impl SettingsForm {
    /// Cleans up the submission before it is saved.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |field: Option<String>| field.map(|v| sanitize_text_field(&v));
        Self {
            cookie_name: clean(self.cookie_name),
            max_age: self.max_age.map(Settings::clamp_max_age),
            cookie_domain: clean(self.cookie_domain),
            consent_func: clean(self.consent_func),
            gen_func: clean(self.gen_func),
        }
    }

    /// Applies the (already sanitized) submission over `current`.
    #[must_use]
    pub fn apply_to(&self, current: &Settings) -> Settings {
        let mut next = current.clone();
        if let Some(name) = &self.cookie_name {
            next.cookie_name = name.clone();
        }
        if let Some(days) = self.max_age {
            next.max_age = days;
        }
        if let Some(domain) = &self.cookie_domain {
            next.cookie_domain = domain.clone();
        }
        if let Some(func) = &self.consent_func {
            next.consent_func = func.clone();
        }
        if let Some(func) = &self.gen_func {
            next.gen_func = func.clone();
        }
        next
    }
}

/// HTML forms submit numbers as text, JSON clients as numbers. Accept both;
/// an empty field counts as not submitted.
fn deserialize_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Days {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Days>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Days::Int(days)) => Ok(Some(days)),
        Some(Days::Float(days)) => Ok(Some(days as i64)),
        Some(Days::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map(Some)
                .or_else(|_| text.parse::<f64>().map(|f| Some(f as i64)))
                .map_err(|_| serde::de::Error::custom(format!("max_age is not a number: {text}")))
        }
    }
}
