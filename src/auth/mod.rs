//! Authentication: decoded claims, the shared session, and the auth context
//! that logs in and out against the API and persists tokens locally.

pub mod claims;
mod context;
mod session;

pub use claims::Claims;
pub use context::{AuthContext, LoginForm, RegisterForm, TokenPair};
pub use session::{Session, SharedSession};

use thiserror::Error;

use crate::api::ApiError;
use crate::models::FieldError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid input: {}", join(.0))]
    Invalid(Vec<FieldError>),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Session lock poisoned")]
    SessionPoisoned,
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AuthError {
    /// Text for a notification
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.user_message(),
            AuthError::Invalid(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| crate::api::FALLBACK_MESSAGE.to_string()),
            other => other.to_string(),
        }
    }
}
