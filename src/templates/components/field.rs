use crate::form::{FieldSpec, FormHandle, InputType, BLURRED_KEY};
use maud::{html, Markup};

pub fn error_slot_id(name: &str) -> String {
    format!("{}-error", name)
}

/// One labeled input bound to `form` by name.
///
/// On blur the whole form is posted to `validate_url`; the response replaces
/// only this field's error slot so the input keeps focus and content.
pub fn field(form: &FormHandle, spec: &FieldSpec, validate_url: &str) -> Markup {
    let error = form.field_error(spec.name);
    // Passwords are never echoed back into the page
    let value = match spec.input_type {
        InputType::Password => None,
        _ => Some(form.value(spec.name)),
    };
    let slot_id = error_slot_id(spec.name);

    html! {
        div class="w-full" {
            label for=(spec.name) class="block mb-2 text-sm font-medium text-primary" {
                (spec.label)
            }
            input type=(spec.input_type.as_str()) id=(spec.name) name=(spec.name)
                value=[value]
                placeholder=(spec.placeholder)
                aria-invalid=[error.as_ref().map(|_| "true")]
                aria-describedby=(slot_id)
                hx-post=(validate_url)
                hx-trigger="blur"
                hx-target={ "#" (slot_id) }
                hx-swap="outerHTML"
                hx-vals=(format!(r#"{{"{}": "{}"}}"#, BLURRED_KEY, spec.name))
                class="bg-tertiary border border-accent-muted text-primary text-sm rounded-lg focus:ring-accent focus:border-accent block w-full p-2.5";
            (error_slot(spec.name, error.as_deref()))
        }
    }
}

/// Container for a field's error message, swapped on blur
pub fn error_slot(name: &str, error: Option<&str>) -> Markup {
    html! {
        div id=(error_slot_id(name)) {
            @if let Some(message) = error {
                p role="alert" class="mt-1 text-sm text-red-500" { (message) }
            }
        }
    }
}
