//! Statement-image analysis abstraction.
//!
//! An analyzer turns a photographed bank statement into transaction
//! drafts with the account left unset for the user to fill in. Analyzer
//! failures are never fatal to the calling flow; the service layer
//! downgrades them to an empty draft list plus a user-visible message.

use crate::domain::TransactionDraft;
use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod mock;

pub use http::HttpAnalyzer;
pub use mock::MockAnalyzer;

/// Extracts transaction drafts from a statement image.
#[async_trait]
pub trait StatementAnalyzer: Send + Sync + fmt::Debug {
    /// Analyze raw image bytes.
    ///
    /// # Returns
    /// Drafts with `account_id` left empty; the caller assigns accounts.
    async fn analyze(&self, image: &[u8]) -> Result<Vec<TransactionDraft>, AnalyzerError>;
}

/// Error type for analyzer operations.
#[derive(Debug, Clone)]
pub enum AnalyzerError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AnalyzerError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            AnalyzerError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AnalyzerError::RateLimited => write!(f, "Rate limited"),
            AnalyzerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for AnalyzerError {}
