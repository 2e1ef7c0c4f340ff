//! Service layer wiring stores, session, and engine together.
//!
//! Services resolve the acting user through [`UserSession`], fetch through
//! the store traits, and run the pure engine functions in between. They
//! hold their collaborators as `Arc<dyn Trait>`, so production and test
//! wiring differ only in which implementations are injected.
//!
//! [`UserSession`]: crate::auth::UserSession

pub mod accounts;
pub mod categories;
pub mod register;

pub use accounts::AccountService;
pub use categories::CategoryService;
pub use register::{RegisterService, ScanOutcome};
