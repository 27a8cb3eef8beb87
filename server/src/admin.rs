//! Administrative settings routes.

use crate::state::AppState;
use crate::ApiError;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::{Form, Router};
use pubcid_settings::{Settings, SettingsForm, SettingsNotice};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings as shown to an administrator, with any advisory notices.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SettingsView {
    pub settings: Settings,
    pub notices: Vec<SettingsNotice>,
}

impl SettingsView {
    fn of(state: &AppState) -> Self {
        Self {
            settings: state.settings(),
            notices: state.notices(),
        }
    }
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsView> {
    Json(SettingsView::of(&state))
}

/// Accepts either an HTML form post or a JSON body.
async fn save_settings(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let form = if is_json {
        match Json::<SettingsForm>::from_request(request, &()).await {
            Ok(Json(form)) => form,
            Err(rejection) => return rejection.into_response(),
        }
    } else {
        match Form::<SettingsForm>::from_request(request, &()).await {
            Ok(Form(form)) => form,
            Err(rejection) => return rejection.into_response(),
        }
    };

    match state.save(form) {
        Ok(_) => Json(SettingsView::of(&state)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Builds the admin router. Serve it on a listener that is not reachable
/// by site visitors.
pub fn build_admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &state.deployment().route("settings"),
            get(get_settings).post(save_settings),
        )
        .with_state(state)
}
