//! In-memory store for tests and examples.
//!
//! Replaces the notion of a "mock mode" inside business logic: services
//! take the store traits, and this implementation is just another store.

use crate::domain::{
    Account, AccountId, AccountPatch, Category, LedgerRow, NewAccount, NewCategory, Transaction,
    UserId,
};
use crate::store::{AccountStore, CategoryStore, StoreError, TransactionFilter, TransactionStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    /// When set, the next `insert_batch` call fails before writing.
    fail_next_batch: bool,
}

/// Store double holding everything behind one lock, so batch inserts are
/// trivially atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account.
    pub async fn with_account(self, account: Account) -> Self {
        self.inner.write().await.accounts.push(account);
        self
    }

    /// Seed an existing transaction.
    pub async fn with_transaction(self, transaction: Transaction) -> Self {
        self.inner.write().await.transactions.push(transaction);
        self
    }

    /// Make the next `insert_batch` call fail without persisting anything.
    pub async fn fail_next_batch(&self) {
        self.inner.write().await.fail_next_batch = true;
    }

    /// Snapshot of every stored transaction, for assertions.
    pub async fn all_transactions(&self) -> Vec<Transaction> {
        self.inner.read().await.transactions.clone()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list_accounts(&self, user: &UserId) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .iter()
            .filter(|a| a.user_id == *user)
            .cloned()
            .collect())
    }

    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.iter().find(|a| a.id == *id).cloned())
    }

    async fn insert_account(&self, user: &UserId, new: NewAccount) -> Result<Account, StoreError> {
        let account = new.into_account(user.clone());
        self.inner.write().await.accounts.push(account.clone());
        Ok(account)
    }

    async fn update_account(
        &self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| StoreError::NotFound(format!("account '{}'", id)))?;
        patch.apply(account);
        Ok(account.clone())
    }

    async fn set_active(&self, id: &AccountId, active: bool) -> Result<Account, StoreError> {
        self.update_account(
            id,
            AccountPatch {
                is_active: Some(active),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_transactions(
        &self,
        user: &UserId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Transaction> = inner
            .transactions
            .iter()
            .filter(|t| t.user_id == *user)
            .filter(|t| {
                filter
                    .account_id
                    .as_ref()
                    .map(|id| t.account_id == *id)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.date, b.created_at).cmp(&(a.date, a.created_at)));
        if let Some(limit) = filter.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn insert_batch(
        &self,
        user: &UserId,
        rows: &[LedgerRow],
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.fail_next_batch {
            inner.fail_next_batch = false;
            return Err(StoreError::BatchFailed {
                attempted: rows.len(),
                source: sqlx::Error::PoolClosed,
            });
        }

        let transactions: Vec<Transaction> = rows
            .iter()
            .map(|row| row.clone().into_transaction(user.clone()))
            .collect();
        inner.transactions.extend(transactions.clone());
        Ok(transactions)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .iter()
            .filter(|c| c.user_id == *user)
            .cloned()
            .collect())
    }

    async fn insert_category(
        &self,
        user: &UserId,
        new: NewCategory,
    ) -> Result<Category, StoreError> {
        let category = new.into_category(user.clone());
        self.inner.write().await.categories.push(category.clone());
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountKind, Direction};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn new_account(name: &str) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            bank: "Test Bank".to_string(),
            kind: AccountKind::Debit,
            currency: "MXN".to_string(),
            initial_balance: Decimal::from_str("0").unwrap(),
            credit_limit: None,
        }
    }

    fn row(account: &AccountId) -> LedgerRow {
        LedgerRow {
            account_id: account.clone(),
            related_account_id: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: "row".to_string(),
            amount: Decimal::from_str("10").unwrap(),
            direction: Direction::Expense,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_scopes_by_user() {
        let store = MemoryStore::new();
        let account = store
            .insert_account(&UserId::new("user-1"), new_account("Mine"))
            .await
            .unwrap();
        store
            .insert_batch(&UserId::new("user-1"), &[row(&account.id)])
            .await
            .unwrap();

        assert_eq!(
            store
                .list_accounts(&UserId::new("user-1"))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(store
            .list_accounts(&UserId::new("user-2"))
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .list_transactions(&UserId::new("user-2"), TransactionFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_fail_next_batch_persists_nothing() {
        let store = MemoryStore::new();
        let user = UserId::new("user-1");
        let account = store
            .insert_account(&user, new_account("Checking"))
            .await
            .unwrap();

        store.fail_next_batch().await;
        let err = store
            .insert_batch(&user, &[row(&account.id), row(&account.id)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BatchFailed { attempted: 2, .. }));
        assert!(store.all_transactions().await.is_empty());

        // One-shot: the store works again afterwards.
        store.insert_batch(&user, &[row(&account.id)]).await.unwrap();
        assert_eq!(store.all_transactions().await.len(), 1);
    }
}
