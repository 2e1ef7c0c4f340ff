//! Store abstraction for accounts, transactions, and categories.
//!
//! The engine never talks to a store directly; the service layer fetches
//! through these traits and feeds the engine plain data. `SqliteStore` is
//! the persistent implementation, `MemoryStore` the test double.

use crate::domain::{
    Account, AccountId, AccountPatch, Category, LedgerRow, NewAccount, NewCategory, Transaction,
    UserId,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStore;
pub use migrations::init_db;
pub use sqlite::SqliteStore;

/// Error type for store operations. Surfaced as-is to callers; the core
/// never retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced entity does not exist (for this user).
    #[error("not found: {0}")]
    NotFound(String),
    /// A stored value could not be decoded into its domain type.
    #[error("corrupt stored value: {0}")]
    Decode(String),
    /// Underlying database failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// A batch insert failed and was rolled back; no rows from the batch
    /// were persisted, so a transfer pair can never end up one-sided.
    #[error("batch insert of {attempted} row(s) rolled back: {source}")]
    BatchFailed {
        attempted: usize,
        #[source]
        source: sqlx::Error,
    },
}

/// Optional narrowing of a transaction listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Restrict to one account.
    pub account_id: Option<AccountId>,
    /// Keep only the most recent N rows.
    pub limit: Option<u32>,
}

impl TransactionFilter {
    /// The most recent `limit` rows across all the user's accounts.
    pub fn recent(limit: u32) -> Self {
        TransactionFilter {
            account_id: None,
            limit: Some(limit),
        }
    }

    /// All rows of one account.
    pub fn for_account(account_id: AccountId) -> Self {
        TransactionFilter {
            account_id: Some(account_id),
            limit: None,
        }
    }
}

/// Account persistence. There is deliberately no delete operation:
/// accounts are soft-deactivated via [`AccountStore::set_active`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All accounts owned by the user, oldest first.
    async fn list_accounts(&self, user: &UserId) -> Result<Vec<Account>, StoreError>;

    /// Fetch a single account by id, scoped to its owner.
    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Persist a new account for the user.
    async fn insert_account(&self, user: &UserId, new: NewAccount) -> Result<Account, StoreError>;

    /// Apply a partial update and return the updated account.
    async fn update_account(
        &self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Account, StoreError>;

    /// Toggle the active flag (soft deactivation / reactivation).
    async fn set_active(&self, id: &AccountId, active: bool) -> Result<Account, StoreError>;
}

/// Transaction persistence.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// The user's transactions, newest first (date, then creation time).
    async fn list_transactions(
        &self,
        user: &UserId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Persist a batch of expanded ledger rows for the user.
    ///
    /// The batch is atomic: either every row is written or none is. This
    /// is what keeps a transfer pair two-sided under partial failure.
    async fn insert_batch(
        &self,
        user: &UserId,
        rows: &[LedgerRow],
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// Category persistence.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories owned by the user, oldest first.
    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>, StoreError>;

    /// Persist a new category for the user.
    async fn insert_category(
        &self,
        user: &UserId,
        new: NewCategory,
    ) -> Result<Category, StoreError>;
}
