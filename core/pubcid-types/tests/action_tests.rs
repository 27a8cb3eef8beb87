use pubcid_types::CookieAction;

#[test]
fn default_is_noop() {
    assert_eq!(CookieAction::default(), CookieAction::NoOp);
    assert!(CookieAction::default().is_noop());
}

#[test]
fn set_exposes_value() {
    let action = CookieAction::Set {
        value: "xyz".into(),
        max_age: 86_400,
        domain: String::new(),
    };
    assert!(action.sets_cookie());
    assert_eq!(action.value(), Some("xyz"));
}

#[test]
fn delete_has_no_value() {
    let action = CookieAction::Delete {
        domain: ".example.com".into(),
    };
    assert!(!action.sets_cookie());
    assert!(!action.is_noop());
    assert_eq!(action.value(), None);
}

#[test]
fn serializes_with_action_tag() {
    let json = serde_json::to_value(CookieAction::Delete {
        domain: "example.com".into(),
    })
    .unwrap();
    assert_eq!(json["action"], "delete");
    assert_eq!(json["domain"], "example.com");
}
