//! Pure ledger logic: balance reduction, draft expansion, and validation.
//!
//! Nothing in this module performs I/O; every function takes plain domain
//! data and returns plain data, which makes it the testable heart of the
//! crate. The service layer feeds it from the stores.

pub mod balance;
pub mod expand;
pub mod validate;

pub use balance::{compute_balance, compute_balances, group_by_account};
pub use expand::{expand, expand_all, ExpandError, TRANSFER_IN_PREFIX};
pub use validate::{validate_batch, validate_draft, FieldError, ValidationError, ValidationResult};
