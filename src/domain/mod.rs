//! Domain types for the finance ledger.
//!
//! This module provides:
//! - Id newtypes scoping every entity to an owning user
//! - Closed enums for account kind and transaction direction
//! - Account, Transaction, and draft types shared by the engine and stores

pub mod account;
pub mod category;
pub mod primitives;
pub mod transaction;

pub use account::{Account, AccountPatch, AccountWithBalance, NewAccount};
pub use category::{Category, NewCategory};
pub use primitives::{
    AccountId, AccountKind, CategoryId, CategoryKind, Direction, ParseEnumError, TransactionId,
    UserId,
};
pub use transaction::{LedgerRow, Transaction, TransactionDraft};
