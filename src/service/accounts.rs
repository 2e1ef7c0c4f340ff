//! Account management and derived balances.

use crate::auth::UserSession;
use crate::domain::{Account, AccountId, AccountPatch, AccountWithBalance, NewAccount, UserId};
use crate::engine::{compute_balance, compute_balances, group_by_account, FieldError};
use crate::error::AppError;
use crate::store::{AccountStore, TransactionFilter, TransactionStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Account CRUD plus balance derivation.
///
/// Balances are never stored; every read recomputes them from the ledger,
/// so they cannot drift from the transactions that explain them.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
    session: Arc<UserSession>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
        session: Arc<UserSession>,
    ) -> Self {
        AccountService {
            accounts,
            transactions,
            session,
        }
    }

    /// All of the user's accounts, active and inactive.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let user = self.session.current_user_id().await?;
        Ok(self.accounts.list_accounts(&user).await?)
    }

    /// Create an account for the user.
    pub async fn create_account(&self, new: NewAccount) -> Result<Account, AppError> {
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidInput(FieldError {
                field: "name",
                message: "account name must not be empty".to_string(),
            }));
        }
        if let Some(limit) = new.credit_limit {
            if limit < Decimal::ZERO {
                return Err(AppError::InvalidInput(FieldError {
                    field: "credit_limit",
                    message: "credit limit must not be negative".to_string(),
                }));
            }
        }

        let user = self.session.current_user_id().await?;
        let account = self.accounts.insert_account(&user, new).await?;
        info!("Created account '{}' ({})", account.name, account.id);
        Ok(account)
    }

    /// Apply a partial update to one of the user's accounts.
    pub async fn update_account(
        &self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Account, AppError> {
        if let Some(Some(limit)) = patch.credit_limit {
            if limit < Decimal::ZERO {
                return Err(AppError::InvalidInput(FieldError {
                    field: "credit_limit",
                    message: "credit limit must not be negative".to_string(),
                }));
            }
        }

        self.owned_account(id).await?;
        Ok(self.accounts.update_account(id, patch).await?)
    }

    /// Soft-deactivate an account. Its transactions stay in the ledger and
    /// keep contributing to history; the account just stops accepting new
    /// rows and disappears from the balance overview.
    pub async fn deactivate_account(&self, id: &AccountId) -> Result<Account, AppError> {
        self.owned_account(id).await?;
        let account = self.accounts.set_active(id, false).await?;
        info!("Deactivated account '{}' ({})", account.name, account.id);
        Ok(account)
    }

    /// Reactivate a previously deactivated account.
    pub async fn reactivate_account(&self, id: &AccountId) -> Result<Account, AppError> {
        self.owned_account(id).await?;
        Ok(self.accounts.set_active(id, true).await?)
    }

    /// Every active account paired with its current balance.
    ///
    /// Accounts and the full ledger are fetched concurrently, then balances
    /// are derived in memory in one pass.
    pub async fn list_accounts_with_balance(&self) -> Result<Vec<AccountWithBalance>, AppError> {
        let user = self.session.current_user_id().await?;
        let (accounts, transactions) = futures::try_join!(
            self.accounts.list_accounts(&user),
            self.transactions
                .list_transactions(&user, TransactionFilter::default()),
        )?;

        let active: Vec<Account> = accounts.into_iter().filter(|a| a.is_active).collect();
        let by_account = group_by_account(transactions);
        let mut balances = compute_balances(&active, &by_account);

        Ok(active
            .into_iter()
            .map(|account| {
                let current_balance = balances
                    .remove(&account.id)
                    .unwrap_or(account.initial_balance);
                AccountWithBalance {
                    account,
                    current_balance,
                }
            })
            .collect())
    }

    /// Current balance of a single account.
    pub async fn account_balance(&self, id: &AccountId) -> Result<Decimal, AppError> {
        let (user, account) = self.owned_account(id).await?;
        let transactions = self
            .transactions
            .list_transactions(&user, TransactionFilter::for_account(id.clone()))
            .await?;
        Ok(compute_balance(account.initial_balance, &transactions))
    }

    /// Fetch an account and verify it belongs to the acting user. A foreign
    /// account is indistinguishable from a missing one.
    async fn owned_account(&self, id: &AccountId) -> Result<(UserId, Account), AppError> {
        let user = self.session.current_user_id().await?;
        match self.accounts.get_account(id).await? {
            Some(account) if account.user_id == user => Ok((user, account)),
            _ => Err(AppError::NotFound(format!("account '{}'", id))),
        }
    }
}
