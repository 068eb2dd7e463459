//! htmx endpoints answering blur validation with a field's error slot.

use super::AppState;
use crate::{
    auth::{login_form, signup_form, LoginForm, SignupForm},
    form::{FieldSpec, FormHandle, Posted},
    templates::components::blur_feedback,
};
use axum::{extract::State, http::StatusCode, response::Html, Form};
use std::{collections::HashMap, sync::Arc};

/// Name of the blurred field, if it is one of `fields`
fn blurred_field(posted: &mut Posted, fields: &[FieldSpec]) -> Result<String, StatusCode> {
    let field = posted.blurred.take().ok_or(StatusCode::BAD_REQUEST)?;
    if !fields.iter().any(|spec| spec.name == field) {
        tracing::debug!("Blur validation requested for unknown field: {}", field);
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(field)
}

fn feedback(handle: &FormHandle, field: &str) -> Html<String> {
    Html(blur_feedback(handle, field).into_string())
}

pub async fn validate_login_field(
    State(state): State<Arc<AppState>>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<Html<String>, StatusCode> {
    let mut posted = Posted::from(body);
    let field = blurred_field(&mut posted, &login_form::FIELDS)?;

    let form = LoginForm::from_posted(state.backend.clone(), posted);
    form.blur(&field);

    Ok(feedback(form.handle(), &field))
}

pub async fn validate_signup_field(
    State(state): State<Arc<AppState>>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<Html<String>, StatusCode> {
    let mut posted = Posted::from(body);
    let field = blurred_field(&mut posted, &signup_form::FIELDS)?;

    let form = SignupForm::from_posted(state.backend.clone(), posted);
    form.blur(&field);

    Ok(feedback(form.handle(), &field))
}
