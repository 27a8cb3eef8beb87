use std::sync::Arc;
use axum::routing::get;
use axum::Router;
use pubcid_cookie::{Capabilities, RequestCookies, PIXEL_GIF};
use pubcid_server::{build_router, build_site_router, AppState, Deployment};
use pubcid_settings::{MemoryOptionStore, OptionsMap, Settings};

fn options_with(settings: Settings) -> Arc<MemoryOptionStore> {
    Arc::new(MemoryOptionStore::with_options(
        settings.merge_into(OptionsMap::new()),
    ))
}

fn test_state(settings: Settings, deployment: Deployment) -> Arc<AppState> {
    Arc::new(AppState::new(
        options_with(settings),
        Capabilities::with_builtins(),
        deployment,
    ))
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_default() -> String {
    spawn(build_router(test_state(Settings::default(), Deployment::default()))).await
}

async fn get_with_cookie(url: String, cookie: Option<&str>) -> reqwest::Response {
    let client = reqwest::Client::new();
    let mut req = client.get(url);
    if let Some(cookie) = cookie {
        req = req.header("cookie", cookie);
    }
    req.send().await.unwrap()
}

fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
    resp.headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn pixel_with_cookie_is_cached_and_refreshed() {
    let base = spawn_default().await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), Some("_pubcid=abc123")).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/gif");
    assert_eq!(resp.headers()["content-encoding"], "none");
    assert_eq!(resp.headers()["cache-control"], "private, max-age=86400");
    assert!(resp.headers().get("expires").is_some());

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("_pubcid=abc123; expires="));
    assert!(cookies[0].ends_with("; path=/; SameSite=Lax"));

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.len(), 43);
    assert_eq!(&body[..], &PIXEL_GIF[..]);
}

#[tokio::test]
async fn pixel_without_cookie_is_not_cached() {
    let base = spawn_default().await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), None).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["cache-control"], "no-cache");
    assert_eq!(resp.headers()["pragma"], "no-cache");
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(resp.bytes().await.unwrap().len(), 43);
}

#[tokio::test]
async fn pixel_generates_identifier_when_configured() {
    let settings = Settings {
        gen_func: "wp_generate_uuid4".into(),
        cookie_domain: ".example.com".into(),
        ..Settings::default()
    };
    let base = spawn(build_router(test_state(settings, Deployment::default()))).await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), None).await;

    // A freshly generated identifier counts as present.
    assert_eq!(resp.headers()["cache-control"], "private, max-age=86400");
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("_pubcid="));
    assert!(cookies[0].contains("; domain=.example.com; SameSite=Lax"));
}

#[tokio::test]
async fn pixel_deletes_cookie_without_consent() {
    let settings = Settings {
        consent_func: "cn_cookies_accepted".into(),
        ..Settings::default()
    };
    let base = spawn(build_router(test_state(settings, Deployment::default()))).await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), Some("_pubcid=abc")).await;

    assert_eq!(resp.headers()["cache-control"], "no-cache");
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("_pubcid=; expires="));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn pixel_refreshes_with_consent() {
    let settings = Settings {
        consent_func: "cn_cookies_accepted".into(),
        ..Settings::default()
    };
    let base = spawn(build_router(test_state(settings, Deployment::default()))).await;
    let resp = get_with_cookie(
        format!("{}/pubcid/v1/extend", base),
        Some("cookie_notice_accepted=true; _pubcid=abc"),
    )
    .await;

    assert_eq!(resp.headers()["cache-control"], "private, max-age=86400");
    assert!(set_cookies(&resp)[0].starts_with("_pubcid=abc;"));
}

#[tokio::test]
async fn disabled_cookie_name_serves_uncached_pixel() {
    let settings = Settings {
        cookie_name: String::new(),
        ..Settings::default()
    };
    let base = spawn(build_router(test_state(settings, Deployment::default()))).await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), Some("_pubcid=abc")).await;

    assert_eq!(resp.headers()["cache-control"], "no-cache");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn pixel_max_age_and_namespace_follow_deployment() {
    let deployment = Deployment {
        pixel_max_age_days: 3,
        namespace: "/ids/".into(),
        ..Deployment::default()
    };
    let base = spawn(build_router(test_state(Settings::default(), deployment))).await;
    let resp = get_with_cookie(format!("{}/ids/extend", base), Some("_pubcid=abc")).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["cache-control"], "private, max-age=259200");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = spawn_default().await;
    let resp = reqwest::get(format!("{}/pubcid/v1/nonexistent", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

// ── all_pages mode ────────────────────────────────────────────────

fn all_pages_app(settings: Settings) -> Router {
    let state = test_state(
        settings,
        Deployment {
            all_pages: true,
            ..Deployment::default()
        },
    );
    build_site_router(
        Router::new().route("/article", get(|| async { "hello" })),
        state,
    )
}

#[tokio::test]
async fn all_pages_pixel_sets_cookie_once() {
    let base = spawn(all_pages_app(Settings::default())).await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), Some("_pubcid=abc")).await;

    assert_eq!(resp.headers()["cache-control"], "private, max-age=86400");
    assert_eq!(set_cookies(&resp).len(), 1);
}

#[tokio::test]
async fn all_pages_generator_runs_once_per_pixel() {
    let settings = Settings {
        gen_func: "uuid4".into(),
        ..Settings::default()
    };
    let base = spawn(all_pages_app(settings)).await;
    let resp = get_with_cookie(format!("{}/pubcid/v1/extend", base), None).await;

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert_eq!(resp.headers()["cache-control"], "private, max-age=86400");
}

#[tokio::test]
async fn pixel_is_idempotent_for_existing_identifier() {
    let base = spawn_default().await;
    let url = format!("{}/pubcid/v1/extend", base);

    let first = set_cookies(&get_with_cookie(url.clone(), Some("_pubcid=stable")).await);
    let second = set_cookies(&get_with_cookie(url, Some("_pubcid=stable")).await);

    let value = |header: &str| {
        let pair = header.split(';').next().unwrap().to_string();
        RequestCookies::parse(&pair).get("_pubcid").map(str::to_string)
    };
    assert_eq!(value(&first[0]), Some("stable".to_string()));
    assert_eq!(value(&first[0]), value(&second[0]));
}
