//! HTTP surface of the Publisher Common ID cookie manager.
//!
//! - `GET /<namespace>/extend`: refreshes the identifier cookie and returns
//!   a 1x1 GIF whose cacheability depends on whether the visitor holds it
//! - `GET|POST /<namespace>/settings` (admin router): read or update the
//!   stored settings
//!
//! With `all_pages` enabled the cookie update runs as middleware on every
//! route of the site router (see [`build_site_router`]), and the pixel
//! handler reuses that decision instead of running it twice.

mod admin;
mod pixel;
mod state;

pub use admin::{build_admin_router, SettingsView};
pub use pixel::{build_router, build_site_router, pubcid_layer, CookieUpdated};
pub use state::{AppState, Deployment, DEFAULT_NAMESPACE};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by handlers; rendered as a plain-text 500.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pubcid_types::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}
