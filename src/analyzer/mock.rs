//! Mock analyzer for testing and offline use.

use super::{AnalyzerError, StatementAnalyzer};
use crate::domain::{AccountId, Direction, TransactionDraft};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Analyzer double returning predefined drafts, or a predefined error.
#[derive(Debug, Clone, Default)]
pub struct MockAnalyzer {
    drafts: Vec<TransactionDraft>,
    error: Option<AnalyzerError>,
}

impl MockAnalyzer {
    /// Create a mock that returns no drafts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a draft to the mock's response.
    pub fn with_draft(mut self, draft: TransactionDraft) -> Self {
        self.drafts.push(draft);
        self
    }

    /// Add multiple drafts to the mock's response.
    pub fn with_drafts(mut self, drafts: Vec<TransactionDraft>) -> Self {
        self.drafts.extend(drafts);
        self
    }

    /// Make every `analyze` call fail with the given error.
    pub fn failing(error: AnalyzerError) -> Self {
        MockAnalyzer {
            drafts: Vec::new(),
            error: Some(error),
        }
    }

    /// A canned extraction result resembling a real statement scan, with
    /// the account left unset for the caller to fill in.
    pub fn canned() -> Self {
        let today = Utc::now().date_naive();
        let draft = |description: &str, amount: &str, direction: Direction| {
            TransactionDraft::new(
                AccountId::new(""),
                today,
                description,
                Decimal::from_str(amount).expect("static decimal"),
                direction,
            )
        };
        MockAnalyzer::new().with_drafts(vec![
            draft("OXXO EXPRESS GDL", "158.50", Direction::Expense),
            draft("UBER TRIP HELP.UBER.COM", "89.90", Direction::Expense),
            draft("PAYROLL TRANSFER RECEIVED", "12500.00", Direction::Income),
        ])
    }
}

#[async_trait]
impl StatementAnalyzer for MockAnalyzer {
    async fn analyze(&self, _image: &[u8]) -> Result<Vec<TransactionDraft>, AnalyzerError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.drafts.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_drafts_have_empty_accounts() {
        let drafts = MockAnalyzer::canned().analyze(b"image").await.unwrap();
        assert_eq!(drafts.len(), 3);
        assert!(drafts.iter().all(|d| d.account_id.is_empty()));
        assert!(drafts.iter().all(|d| d.amount > Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_failing_mock_returns_error() {
        let analyzer = MockAnalyzer::failing(AnalyzerError::RateLimited);
        assert!(matches!(
            analyzer.analyze(b"image").await,
            Err(AnalyzerError::RateLimited)
        ));
    }
}
