//! Draft expansion: turns user-entered transaction intents into the ledger
//! rows to persist, pairing transfers.

use crate::domain::{Direction, LedgerRow, TransactionDraft};
use thiserror::Error;

/// Prefix applied to the synthesized inbound leg of a transfer.
pub const TRANSFER_IN_PREFIX: &str = "Transfer from: ";

/// Error produced while expanding a draft. Both variants are caller-input
/// problems; nothing has been written when they surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// A transfer-out draft is missing its counterparty account or names
    /// the source account as the destination.
    #[error("invalid transfer '{description}': {reason}")]
    InvalidTransfer {
        description: String,
        reason: &'static str,
    },
    /// `transfer_in` only ever arises as expansion output, never as input.
    #[error("direction '{0}' is not accepted as user input")]
    InvalidDirection(Direction),
}

/// Expand a single draft into the ledger rows it implies.
///
/// - `expense` / `income` produce exactly one row with the drafted amount's
///   absolute value (sign carries no meaning at rest).
/// - `transfer_out` produces the outbound row plus a synthesized
///   `transfer_in` row on the counterparty account, same date and amount,
///   each leg pointing at the other. The pair is one atomic unit; the
///   store must write both or neither.
pub fn expand(draft: &TransactionDraft) -> Result<Vec<LedgerRow>, ExpandError> {
    let amount = draft.amount.abs();

    match draft.direction {
        Direction::Expense | Direction::Income => Ok(vec![LedgerRow {
            account_id: draft.account_id.clone(),
            related_account_id: None,
            date: draft.date,
            description: draft.description.clone(),
            amount,
            direction: draft.direction,
            category_id: draft.category_id.clone(),
        }]),
        Direction::TransferOut => {
            let related = draft.related_account_id.clone().ok_or_else(|| {
                ExpandError::InvalidTransfer {
                    description: draft.description.clone(),
                    reason: "missing destination account",
                }
            })?;
            if related == draft.account_id {
                return Err(ExpandError::InvalidTransfer {
                    description: draft.description.clone(),
                    reason: "destination equals source account",
                });
            }

            let outbound = LedgerRow {
                account_id: draft.account_id.clone(),
                related_account_id: Some(related.clone()),
                date: draft.date,
                description: draft.description.clone(),
                amount,
                direction: Direction::TransferOut,
                category_id: draft.category_id.clone(),
            };
            let inbound = LedgerRow {
                account_id: related,
                related_account_id: Some(draft.account_id.clone()),
                date: draft.date,
                description: format!("{}{}", TRANSFER_IN_PREFIX, draft.description),
                amount,
                direction: Direction::TransferIn,
                category_id: None,
            };
            Ok(vec![outbound, inbound])
        }
        Direction::TransferIn => Err(ExpandError::InvalidDirection(Direction::TransferIn)),
    }
}

/// Expand a batch of drafts, concatenating per-draft output and preserving
/// input order. Fails on the first invalid draft; callers are expected to
/// have validated the batch already.
pub fn expand_all(drafts: &[TransactionDraft]) -> Result<Vec<LedgerRow>, ExpandError> {
    let mut rows = Vec::with_capacity(drafts.len());
    for draft in drafts {
        rows.extend(expand(draft)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountId;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn draft(direction: Direction, amount: &str) -> TransactionDraft {
        TransactionDraft::new(AccountId::new("X"), date(), "Groceries", dec(amount), direction)
    }

    #[test]
    fn test_expense_expands_to_single_row() {
        let rows = expand(&draft(Direction::Expense, "50")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_id, AccountId::new("X"));
        assert_eq!(rows[0].direction, Direction::Expense);
        assert_eq!(rows[0].amount, dec("50"));
        assert_eq!(rows[0].related_account_id, None);
    }

    #[test]
    fn test_negative_amount_is_normalized_to_magnitude() {
        let rows = expand(&draft(Direction::Expense, "-50")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, dec("50"));
        assert_eq!(rows[0].direction, Direction::Expense);
    }

    #[test]
    fn test_transfer_out_expands_to_linked_pair() {
        let d = draft(Direction::TransferOut, "100").with_related_account(AccountId::new("Y"));
        let rows = expand(&d).unwrap();
        assert_eq!(rows.len(), 2);

        let out = &rows[0];
        assert_eq!(out.account_id, AccountId::new("X"));
        assert_eq!(out.direction, Direction::TransferOut);
        assert_eq!(out.amount, dec("100"));
        assert_eq!(out.related_account_id, Some(AccountId::new("Y")));

        let inbound = &rows[1];
        assert_eq!(inbound.account_id, AccountId::new("Y"));
        assert_eq!(inbound.direction, Direction::TransferIn);
        assert_eq!(inbound.amount, dec("100"));
        assert_eq!(inbound.related_account_id, Some(AccountId::new("X")));
        assert_eq!(inbound.date, out.date);
        assert!(inbound.description.starts_with(TRANSFER_IN_PREFIX));
        assert!(inbound.description.ends_with("Groceries"));
    }

    #[test]
    fn test_transfer_without_destination_rejected() {
        let err = expand(&draft(Direction::TransferOut, "100")).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidTransfer { reason, .. }
            if reason == "missing destination account"));
    }

    #[test]
    fn test_self_transfer_rejected() {
        let d = draft(Direction::TransferOut, "50").with_related_account(AccountId::new("X"));
        let err = expand(&d).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidTransfer { reason, .. }
            if reason == "destination equals source account"));
    }

    #[test]
    fn test_bare_transfer_in_rejected() {
        let err = expand(&draft(Direction::TransferIn, "25")).unwrap_err();
        assert_eq!(err, ExpandError::InvalidDirection(Direction::TransferIn));
    }

    #[test]
    fn test_expand_all_preserves_input_order() {
        let drafts = vec![
            draft(Direction::Income, "200"),
            draft(Direction::TransferOut, "30").with_related_account(AccountId::new("Y")),
            draft(Direction::Expense, "10"),
        ];
        let rows = expand_all(&drafts).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].direction, Direction::Income);
        assert_eq!(rows[1].direction, Direction::TransferOut);
        assert_eq!(rows[2].direction, Direction::TransferIn);
        assert_eq!(rows[3].direction, Direction::Expense);
    }

    #[test]
    fn test_expand_all_fails_whole_batch_on_invalid_draft() {
        let drafts = vec![
            draft(Direction::Income, "200"),
            draft(Direction::TransferIn, "30"),
        ];
        assert!(expand_all(&drafts).is_err());
    }
}
