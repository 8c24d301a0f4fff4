//! Unified error handling for Donor Core

use thiserror::Error;

/// Result type returned by the core operations
pub type Result<T> = std::result::Result<T, DonorError>;

/// Result type returned by store adapters
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the account, attribute and donation stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness constraint rejected the write (duplicate email or login)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// MySQL reports duplicate keys as error 1062; map those to `Conflict`.
    pub fn from_write(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() || db_err.code().as_deref() == Some("1062") {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
        StoreError::Database(error)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        StoreError::Validation(errors.to_string())
    }
}

/// Errors surfaced at the donor core boundary
#[derive(Error, Debug)]
pub enum DonorError {
    /// Neither `user_email` nor `email` was present in the submission
    #[error("Submission does not contain an email address")]
    MissingEmail,

    #[error("Account creation failed: {0}")]
    AccountCreationFailed(#[source] StoreError),

    #[error("Adapter unavailable: {0}")]
    AdapterUnavailable(#[source] StoreError),
}

impl From<StoreError> for DonorError {
    fn from(error: StoreError) -> Self {
        DonorError::AdapterUnavailable(error)
    }
}

impl DonorError {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            DonorError::MissingEmail => "missing_email",
            DonorError::AccountCreationFailed(_) => "account_creation_failed",
            DonorError::AdapterUnavailable(_) => "adapter_unavailable",
        }
    }
}
