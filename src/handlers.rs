pub mod fragments;
pub mod pages;

pub use fragments::{validate_login_field, validate_signup_field};
pub use pages::{home_page, login, login_page, logout, signup, signup_page};

use crate::auth::AuthBackend;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

pub struct AppState {
    pub backend: Arc<dyn AuthBackend>,
}

/// Whether the request was issued by htmx
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Navigate to `to`: an `HX-Redirect` for htmx requests, a 303 otherwise
pub fn navigate(headers: &HeaderMap, to: &str) -> Response {
    if is_htmx(headers) {
        (StatusCode::OK, [("hx-redirect", to)]).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}
