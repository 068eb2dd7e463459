use super::components::{field, form, FormView};
use crate::auth::{login_form::FIELDS, LoginForm};
use maud::{html, Markup};

pub const VALIDATE_URL: &str = "/login/validate";

/// The form element alone, returned to htmx submissions
pub fn login_form(login: &LoginForm) -> Markup {
    let view = FormView {
        action: "/login",
        submit_text: "Login",
        actions: Some(html! {
            a href="/signup" class="text-sm text-highlight" { "or sign up" }
        }),
    };

    let fields = html! {
        @for spec in &FIELDS {
            (field(login.handle(), spec, VALIDATE_URL))
        }
    };

    form(login.handle(), &view, fields)
}

pub fn login(login: &LoginForm) -> Markup {
    html! {
        div class="max-w-md mx-auto" {
            h1 class="text-4xl font-bold mb-8" { "Login" }
            (login_form(login))
        }
    }
}
