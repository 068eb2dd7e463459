use super::{AuthBackend, AuthError, SuccessCallback};
use crate::{
    form::{
        blank_values, FieldSpec, Form, FormHandle, FormValues, InputType, ObjectSchema, Posted,
        Rule, SubmitError, SubmitHandler, SubmitResult, Submission,
    },
    models::{Credentials, User},
};
use async_trait::async_trait;
use std::sync::Arc;

pub const INVALID_CREDENTIALS: &str = "Sorry, those credentials are invalid";

pub const FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        name: "email",
        label: "Email",
        input_type: InputType::Email,
        placeholder: "Email",
    },
    FieldSpec {
        name: "password",
        label: "Password",
        input_type: InputType::Password,
        placeholder: "Password",
    },
];

pub fn schema() -> ObjectSchema<Credentials> {
    ObjectSchema::new()
        .field("email", [Rule::Required, Rule::Email])
        .field("password", [Rule::Required])
}

pub struct LoginSubmit {
    backend: Arc<dyn AuthBackend>,
    on_success: Option<SuccessCallback>,
}

#[async_trait]
impl SubmitHandler<Credentials> for LoginSubmit {
    type Output = User;

    async fn submit(&self, credentials: Credentials) -> SubmitResult<User> {
        match self
            .backend
            .authenticate(&credentials.email, &credentials.password)
            .await
        {
            Ok(user) => {
                if let Some(on_success) = &self.on_success {
                    on_success(&user);
                }
                Ok(user)
            }
            Err(AuthError::InvalidCredentials) => Err(vec![SubmitError::form(INVALID_CREDENTIALS)]),
            Err(e) => Err(vec![SubmitError::Unexpected(format!(
                "Sorry, we had an unexpected error. Please try again. - {}",
                e
            ))]),
        }
    }
}

/// Login form: email and password checked against the auth backend
pub struct LoginForm {
    form: Form<ObjectSchema<Credentials>, LoginSubmit>,
}

impl LoginForm {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self::with_values(backend, blank_values(&FIELDS))
    }

    pub fn with_values(backend: Arc<dyn AuthBackend>, values: FormValues) -> Self {
        let handler = LoginSubmit {
            backend,
            on_success: None,
        };
        Self {
            form: Form::new(schema(), handler, values),
        }
    }

    /// Rebuild the form from a posted body, including carried submit errors
    pub fn from_posted(backend: Arc<dyn AuthBackend>, posted: Posted) -> Self {
        let form = Self::with_values(backend, posted.values_for(&FIELDS));
        form.handle().restore_carried_errors(posted.carried);
        form
    }

    pub fn on_success(mut self, f: impl Fn(&User) + Send + Sync + 'static) -> Self {
        self.form.handler_mut().on_success = Some(Arc::new(f));
        self
    }

    pub fn handle(&self) -> &FormHandle {
        self.form.handle()
    }

    pub fn blur(&self, field: &str) -> bool {
        self.form.blur(field)
    }

    pub async fn submit(&self) -> Submission<User> {
        self.form.submit().await
    }
}
