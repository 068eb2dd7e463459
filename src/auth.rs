pub mod login_form;
pub mod signup_form;

pub use login_form::LoginForm;
pub use signup_form::SignupForm;

use crate::{
    db::{unique_violation_column, Database},
    models::{normalize_email, User, UserRole},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::{Arc, LazyLock};
use tower_sessions::Session;

const SESSION_USER_KEY: &str = "user_id";

/// Hash checked for unknown emails so every login attempt pays for argon2
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("authloop dummy password").ok());

/// Invoked with the user once a login or signup succeeds
pub type SuccessCallback = Arc<dyn Fn(&User) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Unique constraint failed on the fields: ({field})")]
    Conflict { field: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Account operations the login and signup forms submit to
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Check credentials and return the matching user
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Create a password account with the default role
    async fn create_account(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>>;
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(password_hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[async_trait]
impl AuthBackend for Database {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);

        let user = match self.get_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email: {}", email);
                if let Some(hash) = DUMMY_HASH.as_deref() {
                    let _ = verify_password(password, hash);
                }
                return Err(AuthError::InvalidCredentials);
            }
        };

        let Some(hash) = user.hashed_password.as_deref() else {
            tracing::warn!("Login attempt for account without a password: {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, hash)? {
            tracing::warn!("Failed login attempt for: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        if let Err(e) = self.update_last_login(&user.id).await {
            // Don't fail the login for this
            tracing::error!("Failed to update last login: {}", e);
        }

        Ok(user)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let hashed_password = hash_password(password)?;

        self.create_user(&email, Some(hashed_password), UserRole::User)
            .await
            .map_err(|e| match unique_violation_column(&e) {
                Some(field) => {
                    tracing::warn!("Signup conflict on {} for: {}", field, email);
                    AuthError::Conflict { field }
                }
                None => AuthError::Other(e),
            })
    }

    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        self.get_user_by_id(id).await
    }
}

/// The logged-in user's id, if the session has one
pub struct OptionalAuthUser {
    pub user_id: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                tracing::error!("Failed to extract session");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })?;

        let user_id: Option<String> = session.get(SESSION_USER_KEY).await.map_err(|e| {
            tracing::error!("Failed to get user from session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?;

        Ok(OptionalAuthUser { user_id })
    }
}

/// Helper to store user ID in session
pub async fn login_user(session: &Session, user_id: &str) -> anyhow::Result<()> {
    // New session id on privilege change
    session.cycle_id().await?;
    session
        .insert(SESSION_USER_KEY, user_id.to_string())
        .await?;
    Ok(())
}

/// Helper to remove user from session
pub async fn logout_user(session: &Session) -> anyhow::Result<()> {
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::Utc;
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    /// In-memory backend: accounts keyed by email with plaintext passwords
    #[derive(Default)]
    pub struct FakeBackend {
        accounts: Mutex<HashMap<String, (String, User)>>,
        failure: Option<String>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        pub fn with_account(email: &str, password: &str) -> Self {
            let backend = Self::default();
            backend.insert(email, password);
            backend
        }

        pub fn failing(message: &str) -> Self {
            Self {
                failure: Some(message.to_string()),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn insert(&self, email: &str, password: &str) -> User {
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.to_string(),
                name: None,
                hashed_password: None,
                role: UserRole::User.as_str().to_string(),
                created_at: Utc::now(),
                last_login_at: None,
            };
            self.accounts
                .lock()
                .unwrap()
                .insert(email.to_string(), (password.to_string(), user.clone()));
            user
        }

        fn check_failure(&self) -> Result<(), AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.failure {
                Some(message) => Err(AuthError::Other(anyhow::anyhow!(message.clone()))),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
            self.check_failure()?;
            match self.accounts.lock().unwrap().get(email) {
                Some((stored, user)) if stored == password => Ok(user.clone()),
                _ => Err(AuthError::InvalidCredentials),
            }
        }

        async fn create_account(&self, email: &str, password: &str) -> Result<User, AuthError> {
            self.check_failure()?;
            if self.accounts.lock().unwrap().contains_key(email) {
                return Err(AuthError::Conflict {
                    field: "email".to_string(),
                });
            }
            Ok(self.insert(email, password))
        }

        async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .values()
                .find(|(_, user)| user.id == id)
                .map(|(_, user)| user.clone()))
        }
    }
}
