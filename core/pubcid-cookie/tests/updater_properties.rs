//! Property-based tests for the cookie decision.
//!
//! - A disabled cookie name never produces a mutation
//! - Refused consent never reaches the generator
//! - An existing identifier is refreshed, never replaced

use proptest::prelude::*;
use pubcid_cookie::{CookieAction, CookieConfig, CookieUpdater, RequestCookies};
use pubcid_types::sanitize_text_field;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9-]{1,40}").unwrap()
}

fn domain_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("(\\.?[a-z]{1,10}\\.com)?").unwrap()
}

proptest! {
    #[test]
    fn empty_name_is_always_noop(
        value in value_strategy(),
        days in -10i64..500,
        consent in any::<bool>(),
    ) {
        let config = CookieConfig::new("", days, "")
            .with_consent(move |_: &RequestCookies| consent)
            .with_generator(|| "generated".to_string());
        let cookies = RequestCookies::default().with("_pubcid", value);
        prop_assert_eq!(CookieUpdater::new(config).decide(&cookies), CookieAction::NoOp);
    }

    #[test]
    fn refused_consent_never_generates(
        existing in proptest::option::of(value_strategy()),
        domain in domain_strategy(),
    ) {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let config = CookieConfig::new("_pubcid", 365, domain.clone())
            .with_consent(|_: &RequestCookies| false)
            .with_generator(move || {
                flag.store(true, Ordering::SeqCst);
                "generated".to_string()
            });

        let cookies = match &existing {
            Some(v) => RequestCookies::default().with("_pubcid", v.clone()),
            None => RequestCookies::default(),
        };
        let action = CookieUpdater::new(config).decide(&cookies);

        prop_assert!(!called.load(Ordering::SeqCst));
        match existing {
            Some(_) => prop_assert_eq!(action, CookieAction::Delete { domain }),
            None => prop_assert_eq!(action, CookieAction::NoOp),
        }
    }

    #[test]
    fn existing_identifier_is_refreshed(
        value in value_strategy(),
        days in 0i64..=395,
        domain in domain_strategy(),
    ) {
        let config = CookieConfig::new("_pubcid", days, domain.clone())
            .with_generator(|| "replacement".to_string());
        let cookies = RequestCookies::default().with("_pubcid", value.clone());
        let action = CookieUpdater::new(config).decide(&cookies);

        prop_assert_eq!(action, CookieAction::Set {
            value: sanitize_text_field(&value),
            max_age: days as u64 * 86_400,
            domain,
        });
    }

    #[test]
    fn generator_output_is_used_when_missing(generated in value_strategy()) {
        let expected = generated.clone();
        let config = CookieConfig::new("_pubcid", 365, "")
            .with_generator(move || generated.clone());
        let action = CookieUpdater::new(config).decide(&RequestCookies::default());
        prop_assert_eq!(action.value(), Some(expected.as_str()));
    }
}
