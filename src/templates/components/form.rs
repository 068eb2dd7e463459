use super::field::error_slot;
use crate::form::{FormHandle, SUBMIT_ERRORS_KEY};
use maud::{html, Markup};

const SUBMIT_ERRORS_ID: &str = "form-submit-errors";

/// Rendering options for [`form`]
pub struct FormView<'a> {
    /// Submit target; also used for the htmx post
    pub action: &'a str,
    /// Text to display in the submit button
    pub submit_text: &'a str,
    /// Additional actions shown next to the submit button
    pub actions: Option<Markup>,
}

/// Form container: children fields, the form-level banner and the submit button.
///
/// Submitted through htmx so the server can answer with the re-rendered form;
/// the submit button is disabled while the request is running.
pub fn form(handle: &FormHandle, view: &FormView, children: Markup) -> Markup {
    let submitting = handle.is_submitting();

    html! {
        form action=(view.action) method="post" novalidate
            hx-post=(view.action)
            hx-target="this"
            hx-swap="outerHTML"
            hx-disabled-elt="find button[type='submit']"
            class="bg-secondary rounded-lg p-8 border border-accent-muted space-y-6" {

            (children)

            @if let Some(message) = handle.form_error() {
                div role="alert" class="bg-error border border-error text-primary px-4 py-3 rounded-lg" {
                    (message)
                }
            }

            (submit_errors_input(handle, false))

            div class="flex items-center gap-4" {
                button type="submit" class="btn-primary" disabled[submitting]
                    aria-busy=[submitting.then_some("true")] {
                    (view.submit_text)
                }
                @if let Some(actions) = &view.actions {
                    (actions)
                }
            }
        }
    }
}

/// Hidden input carrying submit-origin field errors to later requests.
///
/// With `oob` set it is marked for an htmx out-of-band swap.
pub fn submit_errors_input(handle: &FormHandle, oob: bool) -> Markup {
    let carried = handle.carried_errors();
    let json = if carried.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&carried).unwrap_or_default()
    };

    html! {
        input type="hidden" id=(SUBMIT_ERRORS_ID) name=(SUBMIT_ERRORS_KEY) value=(json)
            hx-swap-oob=[oob.then_some("true")];
    }
}

/// Response to a blur validation: the field's error slot plus refreshed carried errors
pub fn blur_feedback(handle: &FormHandle, field: &str) -> Markup {
    html! {
        (error_slot(field, handle.field_error(field).as_deref()))
        (submit_errors_input(handle, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{submit_fn, Form, FormValues, NoSchema, SubmitError, SubmitHandler};
    use std::sync::{Arc, OnceLock};

    fn rejecting(errors: Vec<SubmitError>) -> Form<NoSchema, impl SubmitHandler<FormValues>> {
        let values = [("email".to_string(), "taken@example.com".to_string())]
            .into_iter()
            .collect();
        Form::unvalidated(
            submit_fn(move |_: FormValues| {
                let errors = errors.clone();
                async move { Err::<(), _>(errors) }
            }),
            values,
        )
    }

    fn view() -> FormView<'static> {
        FormView {
            action: "/signup",
            submit_text: "Create Account",
            actions: Some(html! { a href="/login" { "or log in" } }),
        }
    }

    #[tokio::test]
    async fn test_banner_rendered_for_form_level_error() {
        let form = rejecting(vec![SubmitError::form("X")]);
        form.submit().await;

        let html = super::form(form.handle(), &view(), html! {}).into_string();
        assert!(html.contains(">X</div>"));
        assert!(html.contains("Create Account"));
        assert!(html.contains("or log in"));
        assert!(!html.contains(" disabled"));
        assert!(!html.contains("aria-busy"));
    }

    #[tokio::test]
    async fn test_submit_button_disabled_while_submitting() {
        let handle_slot: Arc<OnceLock<FormHandle>> = Arc::new(OnceLock::new());
        let slot = handle_slot.clone();
        let form = Form::unvalidated(
            submit_fn(move |_: FormValues| {
                let slot = slot.clone();
                async move {
                    let rendered = slot
                        .get()
                        .map(|handle| super::form(handle, &view(), html! {}).into_string());
                    Ok::<_, Vec<SubmitError>>(rendered)
                }
            }),
            FormValues::new(),
        );
        handle_slot.set(form.handle().clone()).unwrap();

        let during = form.submit().await.accepted().flatten().unwrap();
        assert!(during.contains(" disabled"));
        assert!(during.contains(r#"aria-busy="true""#));

        let after = super::form(form.handle(), &view(), html! {}).into_string();
        assert!(!after.contains(" disabled"));
        assert!(!after.contains("aria-busy"));
    }

    #[tokio::test]
    async fn test_no_banner_for_field_error() {
        let form = rejecting(vec![SubmitError::field("email", "Y")]);
        form.submit().await;

        let html = super::form(form.handle(), &view(), html! {}).into_string();
        assert!(!html.contains(r#"<div role="alert""#));
        assert!(html.contains("taken@example.com"));
    }

    #[tokio::test]
    async fn test_blur_feedback_marks_oob_swap() {
        let form = rejecting(vec![SubmitError::field("email", "Y")]);
        form.submit().await;

        let html = blur_feedback(form.handle(), "email").into_string();
        assert!(html.starts_with(r#"<div id="email-error"><p role="alert""#));
        assert!(html.contains(r#"hx-swap-oob="true""#));
    }
}
