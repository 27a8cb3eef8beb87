use std::sync::Arc;
use axum::routing::get;
use axum::extract::Request;
use axum::Router;
use pubcid_cookie::Capabilities;
use pubcid_server::{build_site_router, AppState, CookieUpdated, Deployment};
use pubcid_settings::{MemoryOptionStore, Settings};
use pubcid_types::CookieAction;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn state(all_pages: bool) -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(MemoryOptionStore::new()),
        Capabilities::with_builtins(),
        Deployment {
            all_pages,
            ..Deployment::default()
        },
    ))
}

async fn page(request: Request) -> String {
    match request.extensions().get::<CookieUpdated>() {
        Some(CookieUpdated(CookieAction::Set { value, .. })) => format!("set:{value}"),
        Some(CookieUpdated(action)) => format!("{action:?}"),
        None => "not-run".to_string(),
    }
}

#[tokio::test]
async fn middleware_updates_cookie_on_host_pages() {
    let app = build_site_router(Router::new().route("/article", get(page)), state(true));
    let base = spawn(app).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/article", base))
        .header("cookie", "_pubcid=from-browser")
        .send()
        .await
        .unwrap();

    let cookie = resp.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("_pubcid=from-browser;"));
    assert_eq!(resp.text().await.unwrap(), "set:from-browser");
}

#[tokio::test]
async fn without_all_pages_host_pages_are_untouched() {
    let app = build_site_router(Router::new().route("/article", get(page)), state(false));
    let base = spawn(app).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/article", base))
        .header("cookie", "_pubcid=from-browser")
        .send()
        .await
        .unwrap();

    assert!(resp.headers().get("set-cookie").is_none());
    assert_eq!(resp.text().await.unwrap(), "not-run");
}
