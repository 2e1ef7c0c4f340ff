//! Ledger rows and the draft type the register UI edits.

use crate::domain::{AccountId, CategoryId, Direction, TransactionId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted ledger row.
///
/// `amount` is always a non-negative magnitude; the balance effect comes
/// from `direction`. Both legs of a completed transfer point at each other
/// through `related_account_id` and share `amount` and `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_account_id: Option<AccountId>,
    /// Calendar date of the movement, no time component.
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// An expansion output row, ready to persist but not yet owned by a user
/// or assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_account_id: Option<AccountId>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl LedgerRow {
    /// Materialize a persisted `Transaction` for the given owner.
    pub fn into_transaction(self, user_id: UserId) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            user_id,
            account_id: self.account_id,
            related_account_id: self.related_account_id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            direction: self.direction,
            category_id: self.category_id,
            created_at: Utc::now(),
        }
    }
}

/// A user-edited transaction intent that has not been validated or
/// persisted. `temp_id` only exists for list editing in a UI and is never
/// written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub temp_id: String,
    pub account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_account_id: Option<AccountId>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl TransactionDraft {
    /// Create a draft with a fresh temporary id.
    pub fn new(
        account_id: AccountId,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        direction: Direction,
    ) -> Self {
        TransactionDraft {
            temp_id: Uuid::new_v4().to_string(),
            account_id,
            related_account_id: None,
            date,
            description: description.into(),
            amount,
            direction,
            category_id: None,
        }
    }

    /// Set the counterparty account (transfer drafts).
    pub fn with_related_account(mut self, related: AccountId) -> Self {
        self.related_account_id = Some(related);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ledger_row_into_transaction_preserves_fields() {
        let row = LedgerRow {
            account_id: AccountId::new("acc-1"),
            related_account_id: Some(AccountId::new("acc-2")),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Rent".to_string(),
            amount: Decimal::from_str("850.50").unwrap(),
            direction: Direction::TransferOut,
            category_id: None,
        };

        let tx = row.clone().into_transaction(UserId::new("user-1"));
        assert_eq!(tx.user_id, UserId::new("user-1"));
        assert_eq!(tx.account_id, row.account_id);
        assert_eq!(tx.related_account_id, row.related_account_id);
        assert_eq!(tx.amount, row.amount);
        assert_eq!(tx.direction, Direction::TransferOut);
        assert!(!tx.id.is_empty());
    }

    #[test]
    fn test_draft_temp_ids_are_unique() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = TransactionDraft::new(
            AccountId::new("acc-1"),
            date,
            "Coffee",
            Decimal::from_str("45").unwrap(),
            Direction::Expense,
        );
        let b = TransactionDraft::new(
            AccountId::new("acc-1"),
            date,
            "Coffee",
            Decimal::from_str("45").unwrap(),
            Direction::Expense,
        );
        assert_ne!(a.temp_id, b.temp_id);
    }
}
