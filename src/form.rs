//! Schema-driven form state.
//!
//! A [`Form`] owns the current field values, the per-field errors, an optional
//! form-level banner and the "submitting" flag. Validation runs on blur and on
//! submit; on submit the configured [`SubmitHandler`] is called with the parsed
//! values and any [`SubmitError`]s it returns are routed to fields or the banner.
//!
//! The state lives behind a [`FormHandle`] that rendering code receives
//! explicitly, so fields never look the form up implicitly.

pub mod schema;
pub mod submit;

pub use schema::{NoSchema, ObjectSchema, Rule, Schema, ValidationErrors, ROOT_PATH};
pub use submit::{submit_fn, FnSubmit, SubmitError, SubmitHandler, SubmitResult, Submission};

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Field name to current value
pub type FormValues = BTreeMap<String, String>;

/// Posted key naming the field that lost focus
pub const BLURRED_KEY: &str = "__form.blurred";

/// Posted key carrying submit-origin field errors between requests
pub const SUBMIT_ERRORS_KEY: &str = "__form.submit_errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Password,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Password => "password",
        }
    }
}

/// Static description of one input rendered by a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: InputType,
    pub placeholder: &'static str,
}

/// Blank initial values for every field in `fields`
pub fn blank_values(fields: &[FieldSpec]) -> FormValues {
    fields
        .iter()
        .map(|field| (field.name.to_string(), String::new()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSource {
    Validation,
    /// Set from a submit result while the field held `value`
    Submit { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
    pub source: ErrorSource,
}

/// A submit-origin field error as carried in a posted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedError {
    pub message: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: FormValues,
    field_errors: BTreeMap<String, FieldError>,
    form_error: Option<String>,
    submitting: bool,
}

impl FormState {
    /// Field paths become field errors; a root-path error goes to the banner
    fn replace_with_validation(&mut self, errors: &ValidationErrors) {
        if let Some(message) = errors.get(ROOT_PATH) {
            self.form_error = Some(message.to_string());
        }
        self.field_errors = errors
            .iter()
            .filter(|(path, _)| *path != ROOT_PATH)
            .map(|(path, message)| {
                (
                    path.to_string(),
                    FieldError {
                        message: message.to_string(),
                        source: ErrorSource::Validation,
                    },
                )
            })
            .collect();
    }

    fn apply_submit_errors(&mut self, errors: &[SubmitError]) {
        for error in errors {
            match error {
                SubmitError::FormLevel(message) => {
                    self.form_error = Some(message.clone());
                }
                SubmitError::Field { name, message } => {
                    let value = self.values.get(name).cloned().unwrap_or_default();
                    self.field_errors.insert(
                        name.clone(),
                        FieldError {
                            message: message.clone(),
                            source: ErrorSource::Submit { value },
                        },
                    );
                }
                SubmitError::Unexpected(message) => {
                    tracing::error!("Unexpected error during form submission: {}", message);
                    self.form_error = Some(message.clone());
                }
            }
        }
    }
}

/// Shared handle to a form's state.
///
/// Cloning the handle shares the same state. The lock is never held across an await.
#[derive(Debug, Clone, Default)]
pub struct FormHandle {
    state: Arc<Mutex<FormState>>,
}

impl FormHandle {
    fn new(values: FormValues) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState {
                values,
                ..FormState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn value(&self, name: &str) -> String {
        self.lock().values.get(name).cloned().unwrap_or_default()
    }

    pub fn values(&self) -> FormValues {
        self.lock().values.clone()
    }

    pub fn set_value(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock().values.insert(name.into(), value.into());
    }

    pub fn field_error(&self, name: &str) -> Option<String> {
        self.lock()
            .field_errors
            .get(name)
            .map(|error| error.message.clone())
    }

    pub fn field_errors(&self) -> BTreeMap<String, FieldError> {
        self.lock().field_errors.clone()
    }

    pub fn form_error(&self) -> Option<String> {
        self.lock().form_error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Submit-origin field errors, in the shape carried between requests
    pub fn carried_errors(&self) -> BTreeMap<String, CarriedError> {
        self.lock()
            .field_errors
            .iter()
            .filter_map(|(name, error)| match &error.source {
                ErrorSource::Submit { value } => Some((
                    name.clone(),
                    CarriedError {
                        message: error.message.clone(),
                        value: value.clone(),
                    },
                )),
                ErrorSource::Validation => None,
            })
            .collect()
    }

    /// Reinstate submit-origin field errors from a previous request
    pub fn restore_carried_errors(&self, carried: BTreeMap<String, CarriedError>) {
        let mut state = self.lock();
        for (name, error) in carried {
            state.field_errors.insert(
                name,
                FieldError {
                    message: error.message,
                    source: ErrorSource::Submit { value: error.value },
                },
            );
        }
    }

    /// Mark a submission as started; false if one is already running
    fn begin_submit(&self) -> bool {
        let mut state = self.lock();
        if state.submitting {
            return false;
        }
        state.submitting = true;
        state.field_errors.clear();
        state.form_error = None;
        true
    }
}

/// Clears the submitting flag when the submission settles or is dropped
struct InFlight<'a>(&'a FormHandle);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.lock().submitting = false;
    }
}

/// Generic form bound to a schema and a submit handler
pub struct Form<S, H> {
    schema: S,
    handler: H,
    handle: FormHandle,
}

impl<H> Form<NoSchema, H>
where
    H: SubmitHandler<FormValues>,
{
    /// A form without a schema; every validation pass succeeds
    pub fn unvalidated(handler: H, initial: FormValues) -> Self {
        Form::new(NoSchema, handler, initial)
    }
}

impl<S, H> Form<S, H>
where
    S: Schema,
    H: SubmitHandler<S::Output>,
{
    pub fn new(schema: S, handler: H, initial: FormValues) -> Self {
        Self {
            schema,
            handler,
            handle: FormHandle::new(initial),
        }
    }

    pub fn handle(&self) -> &FormHandle {
        &self.handle
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn set_value(&self, name: impl Into<String>, value: impl Into<String>) {
        self.handle.set_value(name, value);
    }

    /// Validate the current values without touching error state
    pub fn validate(&self) -> Result<S::Output, ValidationErrors> {
        self.schema.parse(&self.handle.values())
    }

    /// Validate after `name` loses focus and update that field's error.
    ///
    /// A submit-origin error survives a passing blur until the field's value
    /// changes from the value it was reported against. Returns true if the
    /// field is currently valid.
    pub fn blur(&self, name: &str) -> bool {
        let result = self.validate();
        let mut state = self.handle.lock();

        let message = match &result {
            Ok(_) => None,
            Err(errors) => errors.get(name).map(str::to_string),
        };

        match message {
            Some(message) => {
                tracing::debug!("Field {} failed validation: {}", name, message);
                state.field_errors.insert(
                    name.to_string(),
                    FieldError {
                        message,
                        source: ErrorSource::Validation,
                    },
                );
                false
            }
            None => {
                let current = state.values.get(name).cloned().unwrap_or_default();
                let keep = matches!(
                    state.field_errors.get(name),
                    Some(FieldError { source: ErrorSource::Submit { value }, .. }) if *value == current
                );
                if !keep {
                    state.field_errors.remove(name);
                }
                true
            }
        }
    }

    /// Validate and, if valid, run the submit handler and route its errors
    pub async fn submit(&self) -> Submission<H::Output> {
        let parsed = match self.validate() {
            Ok(parsed) => parsed,
            Err(errors) => {
                tracing::debug!("Form submission blocked by {} invalid field(s)", errors.len());
                self.handle.lock().replace_with_validation(&errors);
                return Submission::Invalid;
            }
        };

        if !self.handle.begin_submit() {
            tracing::warn!("Form submission refused: previous submission still in flight");
            return Submission::InFlight;
        }
        let _in_flight = InFlight(&self.handle);

        match self.handler.submit(parsed).await {
            Ok(output) => Submission::Accepted(output),
            Err(errors) => {
                self.handle.lock().apply_submit_errors(&errors);
                Submission::Rejected(errors)
            }
        }
    }
}

/// A posted form body split into field values and form bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Posted {
    pub values: FormValues,
    pub blurred: Option<String>,
    pub carried: BTreeMap<String, CarriedError>,
}

impl Posted {
    /// Keep only the values of `fields`, falling back to blank values
    pub fn values_for(&self, fields: &[FieldSpec]) -> FormValues {
        fields
            .iter()
            .map(|field| {
                let value = self.values.get(field.name).cloned().unwrap_or_default();
                (field.name.to_string(), value)
            })
            .collect()
    }
}

impl From<HashMap<String, String>> for Posted {
    fn from(mut body: HashMap<String, String>) -> Self {
        let blurred = body.remove(BLURRED_KEY);
        let carried = match body.remove(SUBMIT_ERRORS_KEY) {
            Some(json) if !json.is_empty() => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::debug!("Ignoring malformed carried submit errors: {}", e);
                BTreeMap::new()
            }),
            _ => BTreeMap::new(),
        };

        Self {
            values: body.into_iter().collect(),
            blurred,
            carried,
        }
    }
}
