use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::{path::Path, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

/// Build the application router
pub fn router<Store>(
    state: Arc<AppState>,
    sessions: SessionManagerLayer<Store>,
    static_dir: &Path,
) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        // Page routes
        .route("/", get(handlers::home_page))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/signup", get(handlers::signup_page).post(handlers::signup))
        .route("/logout", post(handlers::logout))
        // Blur validation fragments
        .route("/login/validate", post(handlers::validate_login_field))
        .route("/signup/validate", post(handlers::validate_signup_field))
        // Static files
        .nest_service("/static", ServeDir::new(static_dir))
        // State and middleware
        .with_state(state)
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
}
