//! Register flow: capture drafts, validate, expand, persist.

use crate::analyzer::StatementAnalyzer;
use crate::auth::UserSession;
use crate::domain::{Account, AccountId, Transaction, TransactionDraft};
use crate::engine::{expand_all, validate_batch};
use crate::error::AppError;
use crate::store::{AccountStore, TransactionFilter, TransactionStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of scanning a statement image.
///
/// A scan never fails the caller: analyzer trouble shows up as an empty
/// draft list plus a message, and the user keys in the rows by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub drafts: Vec<TransactionDraft>,
    /// Present when the analyzer failed and the drafts are empty.
    pub error: Option<String>,
}

/// Draft capture and persistence.
#[derive(Clone)]
pub struct RegisterService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
    analyzer: Arc<dyn StatementAnalyzer>,
    session: Arc<UserSession>,
}

impl RegisterService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
        analyzer: Arc<dyn StatementAnalyzer>,
        session: Arc<UserSession>,
    ) -> Self {
        RegisterService {
            accounts,
            transactions,
            analyzer,
            session,
        }
    }

    /// Validate, expand, and persist a batch of drafts.
    ///
    /// The batch is all-or-nothing at every stage: one invalid draft
    /// rejects the whole batch, and the expanded rows (both legs of each
    /// transfer included) are inserted in a single atomic write.
    pub async fn save_drafts(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, AppError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let user = self.session.current_user_id().await?;
        let active: HashSet<AccountId> = self
            .accounts
            .list_accounts(&user)
            .await?
            .into_iter()
            .filter(|a| a.is_active)
            .map(|a| a.id)
            .collect();

        validate_batch(&drafts, &active)?;
        let rows = expand_all(&drafts)?;
        let saved = self.transactions.insert_batch(&user, &rows).await?;
        info!(
            "Saved {} draft(s) as {} ledger row(s)",
            drafts.len(),
            saved.len()
        );
        Ok(saved)
    }

    /// Extract drafts from a statement image.
    ///
    /// When the user has exactly one active account, the extracted drafts
    /// are pre-assigned to it; otherwise the account is left for the user
    /// to pick. Analyzer failures are downgraded, never propagated.
    pub async fn scan_statement(&self, image: &[u8]) -> Result<ScanOutcome, AppError> {
        let user = self.session.current_user_id().await?;

        let mut drafts = match self.analyzer.analyze(image).await {
            Ok(drafts) => drafts,
            Err(error) => {
                warn!("Statement analysis failed: {}", error);
                return Ok(ScanOutcome {
                    drafts: Vec::new(),
                    error: Some(error.to_string()),
                });
            }
        };

        let active: Vec<Account> = self
            .accounts
            .list_accounts(&user)
            .await?
            .into_iter()
            .filter(|a| a.is_active)
            .collect();
        if let [only] = active.as_slice() {
            for draft in drafts.iter_mut().filter(|d| d.account_id.is_empty()) {
                draft.account_id = only.id.clone();
            }
        }

        info!("Extracted {} draft(s) from statement image", drafts.len());
        Ok(ScanOutcome {
            drafts,
            error: None,
        })
    }

    /// The user's most recent transactions across all accounts.
    pub async fn recent_transactions(&self, limit: u32) -> Result<Vec<Transaction>, AppError> {
        self.list_transactions(TransactionFilter::recent(limit)).await
    }

    /// The user's transactions, optionally narrowed by account or count.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let user = self.session.current_user_id().await?;
        Ok(self.transactions.list_transactions(&user, filter).await?)
    }
}
