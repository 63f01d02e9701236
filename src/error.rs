//! Service-level errors
//!
//! Everything a backend operation can fail with. The HTTP layer maps each
//! variant onto a status code.

use thiserror::Error;

use crate::ai::AiError;
use crate::db::DbError;
use crate::metrics::ProfileError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Missing required data for body metrics calculation")]
    MissingProfileData { required: Vec<&'static str> },

    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("{context}: {source}")]
    Ai {
        context: &'static str,
        #[source]
        source: AiError,
    },

    #[error("Failed to hash password: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    /// Wrap an AI failure with the feature that produced it
    pub fn ai(context: &'static str) -> impl FnOnce(AiError) -> Self {
        move |source| ApiError::Ai { context, source }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
