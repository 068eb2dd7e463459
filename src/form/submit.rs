use async_trait::async_trait;
use std::{fmt, future::Future};

/// Error reported by a submit handler, routed by the form to where it is displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Message shown in the form-level banner
    FormLevel(String),
    /// Message attached to a single field
    Field { name: String, message: String },
    /// Failure the handler did not anticipate; shown in the banner and logged
    Unexpected(String),
}

impl SubmitError {
    pub fn form(message: impl Into<String>) -> Self {
        SubmitError::FormLevel(message.into())
    }

    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        SubmitError::Field {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn unexpected(error: impl fmt::Display) -> Self {
        SubmitError::Unexpected(error.to_string())
    }
}

pub type SubmitResult<T = ()> = Result<T, Vec<SubmitError>>;

/// Async action run with the parsed values once a form validates.
///
/// Expected failures are returned as [`SubmitError`]s rather than raised.
#[async_trait]
pub trait SubmitHandler<V>: Send + Sync
where
    V: Send + 'static,
{
    type Output: Send;

    async fn submit(&self, values: V) -> SubmitResult<Self::Output>;
}

/// Adapts an async closure into a [`SubmitHandler`]
pub struct FnSubmit<F>(F);

pub fn submit_fn<F>(f: F) -> FnSubmit<F> {
    FnSubmit(f)
}

#[async_trait]
impl<V, F, Fut, T> SubmitHandler<V> for FnSubmit<F>
where
    V: Send + 'static,
    F: Fn(V) -> Fut + Send + Sync,
    Fut: Future<Output = SubmitResult<T>> + Send,
    T: Send,
{
    type Output = T;

    async fn submit(&self, values: V) -> SubmitResult<T> {
        (self.0)(values).await
    }
}

/// Outcome of a single submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    /// Schema validation failed; the handler was not called
    Invalid,
    /// Another submission was still running; the handler was not called
    InFlight,
    /// The handler ran and reported errors
    Rejected(Vec<SubmitError>),
    /// The handler ran and succeeded
    Accepted(T),
}

impl<T> Submission<T> {
    pub fn accepted(self) -> Option<T> {
        match self {
            Submission::Accepted(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted(_))
    }
}
