use super::{is_htmx, navigate, AppState};
use crate::{
    auth::{login_user, logout_user, LoginForm, OptionalAuthUser, SignupForm},
    form::{Posted, Submission},
    models::User,
    templates,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use std::{collections::HashMap, sync::Arc};
use tower_sessions::Session;

async fn current_user(state: &AppState, opt_auth: OptionalAuthUser) -> Option<User> {
    let user_id = opt_auth.user_id?;
    match state.backend.get_user(&user_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to get user {}: {}", user_id, e);
            None
        }
    }
}

pub async fn home_page(
    State(state): State<Arc<AppState>>,
    opt_auth: OptionalAuthUser,
) -> Html<String> {
    let user = current_user(&state, opt_auth).await;

    let content = templates::home(user.as_ref());
    let page = templates::base_with_user(None, content, user.as_ref().map(|u| u.email.as_str()));

    Html(page.into_string())
}

pub async fn login_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = LoginForm::new(state.backend.clone());
    let page = templates::base(Some("Log In"), templates::login(&form));
    Html(page.into_string())
}

pub async fn signup_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = SignupForm::new(state.backend.clone());
    let page = templates::base(Some("Sign Up"), templates::signup(&form));
    Html(page.into_string())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    let form = LoginForm::from_posted(state.backend.clone(), Posted::from(body))
        .on_success(|user| tracing::info!("User {} logged in successfully", user.email));

    match form.submit().await {
        Submission::Accepted(user) => {
            if let Err(e) = login_user(&session, &user.id).await {
                tracing::error!("Failed to create session: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            navigate(&headers, "/")
        }
        _ => {
            if is_htmx(&headers) {
                Html(templates::login_form(&form).into_string()).into_response()
            } else {
                let page = templates::base(Some("Log In"), templates::login(&form));
                Html(page.into_string()).into_response()
            }
        }
    }
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    let form = SignupForm::from_posted(state.backend.clone(), Posted::from(body))
        .on_success(|user| tracing::info!("New user registered: {}", user.email));

    match form.submit().await {
        Submission::Accepted(user) => {
            // Log the user in immediately
            if let Err(e) = login_user(&session, &user.id).await {
                tracing::error!("Failed to create session after signup: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            navigate(&headers, "/")
        }
        _ => {
            if is_htmx(&headers) {
                Html(templates::signup_form(&form).into_string()).into_response()
            } else {
                let page = templates::base(Some("Sign Up"), templates::signup(&form));
                Html(page.into_string()).into_response()
            }
        }
    }
}

pub async fn logout(session: Session, headers: HeaderMap) -> Response {
    if let Err(e) = logout_user(&session).await {
        tracing::error!("Failed to logout: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    navigate(&headers, "/")
}
