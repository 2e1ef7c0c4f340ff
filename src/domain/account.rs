//! Bank account entity and its write payloads.

use crate::domain::{AccountId, AccountKind, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank account owned by exactly one user.
///
/// Accounts are never hard-deleted; an account with reachable transactions
/// is only ever deactivated via `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,
    pub name: String,
    /// Display label of the issuing bank.
    pub bank: String,
    pub kind: AccountKind,
    /// ISO currency code, e.g. "MXN" or "USD".
    pub currency: String,
    /// Balance the account started with; transactions apply on top of it.
    pub initial_balance: Decimal,
    /// Only semantically required for `AccountKind::Credit`; non-negative
    /// when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields the user supplies when creating an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub bank: String,
    pub kind: AccountKind,
    pub currency: String,
    pub initial_balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Decimal>,
}

impl NewAccount {
    /// Materialize a full `Account` for the given owner.
    pub fn into_account(self, user_id: UserId) -> Account {
        Account {
            id: AccountId::generate(),
            user_id,
            name: self.name,
            bank: self.bank,
            kind: self.kind,
            currency: self.currency,
            initial_balance: self.initial_balance,
            credit_limit: self.credit_limit,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Partial update applied to an existing account; `None` leaves the field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub bank: Option<String>,
    pub kind: Option<AccountKind>,
    pub currency: Option<String>,
    pub initial_balance: Option<Decimal>,
    /// `Some(None)` clears the limit, `Some(Some(_))` replaces it.
    pub credit_limit: Option<Option<Decimal>>,
    pub is_active: Option<bool>,
}

impl AccountPatch {
    /// Apply this patch to an account in place.
    pub fn apply(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(bank) = &self.bank {
            account.bank = bank.clone();
        }
        if let Some(kind) = self.kind {
            account.kind = kind;
        }
        if let Some(currency) = &self.currency {
            account.currency = currency.clone();
        }
        if let Some(initial_balance) = self.initial_balance {
            account.initial_balance = initial_balance;
        }
        if let Some(credit_limit) = self.credit_limit {
            account.credit_limit = credit_limit;
        }
        if let Some(is_active) = self.is_active {
            account.is_active = is_active;
        }
    }
}

/// An account together with its balance as derived from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountWithBalance {
    #[serde(flatten)]
    pub account: Account,
    pub current_balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_new_account() -> NewAccount {
        NewAccount {
            name: "Checking".to_string(),
            bank: "BBVA".to_string(),
            kind: AccountKind::Debit,
            currency: "MXN".to_string(),
            initial_balance: Decimal::from_str("1000").unwrap(),
            credit_limit: None,
        }
    }

    #[test]
    fn test_into_account_sets_owner_and_active() {
        let account = sample_new_account().into_account(UserId::new("user-1"));
        assert_eq!(account.user_id, UserId::new("user-1"));
        assert!(account.is_active);
        assert!(!account.id.is_empty());
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut account = sample_new_account().into_account(UserId::new("user-1"));
        let patch = AccountPatch {
            name: Some("Daily".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        patch.apply(&mut account);
        assert_eq!(account.name, "Daily");
        assert!(!account.is_active);
        assert_eq!(account.bank, "BBVA");
    }

    #[test]
    fn test_patch_can_clear_credit_limit() {
        let mut account = sample_new_account().into_account(UserId::new("user-1"));
        account.credit_limit = Some(Decimal::from_str("5000").unwrap());
        let patch = AccountPatch {
            credit_limit: Some(None),
            ..Default::default()
        };
        patch.apply(&mut account);
        assert_eq!(account.credit_limit, None);
    }
}
