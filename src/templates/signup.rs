use super::components::{field, form, FormView};
use crate::auth::{signup_form::FIELDS, SignupForm};
use maud::{html, Markup};

pub const VALIDATE_URL: &str = "/signup/validate";

/// The form element alone, returned to htmx submissions
pub fn signup_form(signup: &SignupForm) -> Markup {
    let view = FormView {
        action: "/signup",
        submit_text: "Create Account",
        actions: Some(html! {
            a href="/login" class="text-sm text-highlight" { "or log in" }
        }),
    };

    let fields = html! {
        @for spec in &FIELDS {
            (field(signup.handle(), spec, VALIDATE_URL))
        }
    };

    form(signup.handle(), &view, fields)
}

pub fn signup(signup: &SignupForm) -> Markup {
    html! {
        div class="max-w-md mx-auto" {
            h1 class="text-4xl font-bold mb-8" { "Create an Account" }
            (signup_form(signup))
        }
    }
}
