//! Field-level draft validation.
//!
//! Checks are independent and all failures are collected; nothing
//! short-circuits on the first error.

use crate::domain::{AccountId, Direction, TransactionDraft};
use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

/// One failed field check on a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a single draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The collected field errors; empty when valid.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }
}

/// Whole-batch rejection: partial acceptance is not permitted, so a single
/// failing draft aborts the batch before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of {total} draft(s) failed validation", .failures.len())]
pub struct ValidationError {
    /// (draft index, field errors) for every failing draft.
    pub failures: Vec<(usize, Vec<FieldError>)>,
    /// Size of the rejected batch.
    pub total: usize,
}

/// Validate one draft against the user's active accounts.
///
/// Rules (each independent):
/// - `account_id` must be set and reference an active account
/// - `amount` must be strictly greater than zero
/// - `description` must be non-empty after trimming
/// - a transfer-out must name a counterparty that is another of the
///   user's active accounts
/// - `transfer_in` is never valid as direct input
pub fn validate_draft(
    draft: &TransactionDraft,
    active_accounts: &HashSet<AccountId>,
) -> ValidationResult {
    let mut errors = Vec::new();

    if draft.account_id.is_empty() {
        errors.push(FieldError::new("account_id", "an account must be selected"));
    } else if !active_accounts.contains(&draft.account_id) {
        errors.push(FieldError::new(
            "account_id",
            format!("account '{}' is not an active account", draft.account_id),
        ));
    }

    if draft.amount <= Decimal::ZERO {
        errors.push(FieldError::new("amount", "amount must be greater than zero"));
    }

    if draft.description.trim().is_empty() {
        errors.push(FieldError::new("description", "description must not be empty"));
    }

    match draft.direction {
        Direction::TransferOut => match &draft.related_account_id {
            None => errors.push(FieldError::new(
                "related_account_id",
                "a transfer needs a destination account",
            )),
            Some(related) if *related == draft.account_id => errors.push(FieldError::new(
                "related_account_id",
                "destination must differ from the source account",
            )),
            Some(related) if !active_accounts.contains(related) => errors.push(FieldError::new(
                "related_account_id",
                format!("account '{}' is not an active account", related),
            )),
            Some(_) => {}
        },
        Direction::TransferIn => errors.push(FieldError::new(
            "direction",
            "transfer_in rows are created automatically and cannot be entered",
        )),
        Direction::Expense | Direction::Income => {}
    }

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Validate a batch of drafts as a unit.
///
/// Returns `Err` carrying every failing draft's errors if any single draft
/// fails; the caller must fix all rows before any are persisted.
pub fn validate_batch(
    drafts: &[TransactionDraft],
    active_accounts: &HashSet<AccountId>,
) -> Result<(), ValidationError> {
    let failures: Vec<(usize, Vec<FieldError>)> = drafts
        .iter()
        .enumerate()
        .filter_map(|(index, draft)| match validate_draft(draft, active_accounts) {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some((index, errors)),
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            failures,
            total: drafts.len(),
        })
    }
}
