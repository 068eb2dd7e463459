use super::{AuthBackend, AuthError, SuccessCallback};
use crate::{
    form::{
        blank_values, FieldSpec, Form, FormHandle, FormValues, InputType, ObjectSchema, Posted,
        Rule, SubmitError, SubmitHandler, SubmitResult, Submission,
    },
    models::{NewAccount, User},
};
use async_trait::async_trait;
use std::sync::Arc;

pub const EMAIL_IN_USE: &str = "This email is already being used";

pub const FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        name: "email",
        label: "Email",
        input_type: InputType::Text,
        placeholder: "Email",
    },
    FieldSpec {
        name: "password",
        label: "Password",
        input_type: InputType::Password,
        placeholder: "Password",
    },
];

pub fn schema() -> ObjectSchema<NewAccount> {
    ObjectSchema::new()
        .field("email", [Rule::Required, Rule::Email])
        .field(
            "password",
            [Rule::Required, Rule::MinLength(10), Rule::MaxLength(100)],
        )
}

pub struct SignupSubmit {
    backend: Arc<dyn AuthBackend>,
    on_success: Option<SuccessCallback>,
}

#[async_trait]
impl SubmitHandler<NewAccount> for SignupSubmit {
    type Output = User;

    async fn submit(&self, account: NewAccount) -> SubmitResult<User> {
        match self
            .backend
            .create_account(&account.email, &account.password)
            .await
        {
            Ok(user) => {
                if let Some(on_success) = &self.on_success {
                    on_success(&user);
                }
                Ok(user)
            }
            Err(AuthError::Conflict { field }) if field == "email" => {
                Err(vec![SubmitError::field("email", EMAIL_IN_USE)])
            }
            Err(e) => Err(vec![SubmitError::unexpected(e)]),
        }
    }
}

/// Signup form: creates a password account through the auth backend
pub struct SignupForm {
    form: Form<ObjectSchema<NewAccount>, SignupSubmit>,
}

impl SignupForm {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self::with_values(backend, blank_values(&FIELDS))
    }

    pub fn with_values(backend: Arc<dyn AuthBackend>, values: FormValues) -> Self {
        let handler = SignupSubmit {
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
