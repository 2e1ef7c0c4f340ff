//! Account balance computation.
//!
//! The reduction is commutative, so no ordering guarantee is required from
//! the transaction source.

use crate::domain::{Account, AccountId, Transaction};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Compute the current balance of one account.
///
/// Starts from `initial_balance` and applies each transaction: inflow
/// directions (`income`, `transfer_in`) add the amount, outflow directions
/// (`expense`, `transfer_out`) subtract it. An empty transaction list
/// returns `initial_balance` unchanged. Credit accounts are not
/// special-cased; a deeply negative balance is a presentation concern.
pub fn compute_balance<'a, I>(initial_balance: Decimal, transactions: I) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().fold(initial_balance, |running, tx| {
        if tx.direction.is_inflow() {
            running + tx.amount
        } else {
            running - tx.amount
        }
    })
}

/// Compute balances for a set of accounts at once.
///
/// Accounts with no entry in `by_account` get their initial balance. The
/// result is identical to calling [`compute_balance`] per account.
pub fn compute_balances(
    accounts: &[Account],
    by_account: &HashMap<AccountId, Vec<Transaction>>,
) -> HashMap<AccountId, Decimal> {
    accounts
        .iter()
        .map(|account| {
            let transactions = by_account.get(&account.id).map(Vec::as_slice).unwrap_or(&[]);
            (
                account.id.clone(),
                compute_balance(account.initial_balance, transactions),
            )
        })
        .collect()
}

/// Group a flat transaction list by owning account.
pub fn group_by_account(transactions: Vec<Transaction>) -> HashMap<AccountId, Vec<Transaction>> {
    let mut grouped: HashMap<AccountId, Vec<Transaction>> = HashMap::new();
    for tx in transactions {
        grouped.entry(tx.account_id.clone()).or_default().push(tx);
    }
    grouped
}
