use crate::auth::AuthError;
use crate::engine::{ExpandError, FieldError, ValidationError};
use crate::store::StoreError;
use thiserror::Error;

/// Top-level error for service operations.
///
/// `AnalyzerError` is deliberately absent: statement-analysis failures are
/// downgraded to an empty draft list by the service layer and surfaced as
/// a message in the scan outcome, never as a failure of the overall flow.
#[derive(Debug, Error)]
pub enum AppError {
    /// No resolvable user; the caller must re-authenticate.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Caller-input problem; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A single rejected field outside batch validation (e.g. a negative
    /// credit limit on account creation).
    #[error("invalid input: {0}")]
    InvalidInput(FieldError),
    /// Caller-input problem found during expansion; nothing was written.
    #[error(transparent)]
    Expand(#[from] ExpandError),
    /// I/O failure from the backing store, surfaced as-is (no retry here).
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The referenced entity does not exist for this user.
    #[error("not found: {0}")]
    NotFound(String),
}
