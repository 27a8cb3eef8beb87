//! The extend pixel and the all-pages cookie middleware.

use crate::state::AppState;
use crate::ApiError;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use pubcid_cookie::{cookie_present_after, set_cookie_header, PixelResponse, RequestCookies};
use pubcid_types::CookieAction;
use std::sync::Arc;
use tracing::{debug, warn};

/// Request extension recording that the cookie update already ran for this
/// request, and what it decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieUpdated(pub CookieAction);

/// Middleware running the cookie update on every request it wraps.
///
/// The decision is stored as a [`CookieUpdated`] extension before the inner
/// handler runs, and its `Set-Cookie` header is added to the response.
pub async fn pubcid_layer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookies = RequestCookies::from_headers(request.headers());
    let updater = state.updater();
    let action = updater.decide(&cookies);
    request.extensions_mut().insert(CookieUpdated(action.clone()));

    let mut response = next.run(request).await;

    match set_cookie_header(&updater.config().cookie_name, &action, Utc::now()) {
        Ok(Some(header)) => {
            response.headers_mut().append(SET_COOKIE, header);
        }
        Ok(None) => {}
        Err(e) => warn!("Skipping identifier cookie update: {}", e),
    }
    response
}

async fn extend_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let cookies = RequestCookies::from_headers(request.headers());
    let updated = request.extensions().get::<CookieUpdated>().cloned();
    let updater = state.updater();
    let now = Utc::now();
    let mut cookie_headers = HeaderMap::new();

    let action = match updated {
        Some(CookieUpdated(action)) => action,
        None => updater
            .apply(&cookies, &mut cookie_headers, now)
            .unwrap_or_else(|e| {
                warn!("Skipping identifier cookie update: {}", e);
                CookieAction::NoOp
            }),
    };

    let present = cookie_present_after(&action, &cookies, &updater.config().cookie_name);
    debug!(present, "Serving pixel");

    let pixel = PixelResponse::build(present, state.deployment().pixel_max_age_days, now)
        .or_else(|e| {
            warn!("Falling back to uncached pixel: {}", e);
            PixelResponse::build(false, 0, now)
        });
    let pixel = match pixel {
        Ok(pixel) => pixel,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let mut response = Response::new(Body::from(pixel.body));
    *response.headers_mut() = pixel.headers;
    for value in cookie_headers.get_all(SET_COOKIE) {
        response.headers_mut().append(SET_COOKIE, value.clone());
    }
    response
}

/// Builds the public router serving the extend pixel.
pub fn build_router(state: Arc<AppState>) -> Router {
    build_site_router(Router::new(), state)
}

/// Merges the extend pixel into a host's page routes.
///
/// With `all_pages` enabled, [`pubcid_layer`] wraps every route of the
/// result, so the cookie is maintained on the host's pages as well.
pub fn build_site_router(pages: Router, state: Arc<AppState>) -> Router {
    let pixel = Router::new()
        .route(&state.deployment().route("extend"), get(extend_handler))
        .with_state(Arc::clone(&state));
    let router = pages.merge(pixel);

    if state.deployment().all_pages {
        router.layer(middleware::from_fn_with_state(state, pubcid_layer))
    } else {
        router
    }
}
