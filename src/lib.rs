pub mod analyzer;
pub mod auth;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod service;
pub mod store;

pub use analyzer::{AnalyzerError, HttpAnalyzer, MockAnalyzer, StatementAnalyzer};
pub use auth::{AuthError, IdentityProvider, StaticIdentity, UserSession};
pub use config::Config;
pub use domain::{
    Account, AccountId, AccountKind, AccountPatch, AccountWithBalance, Category, CategoryId,
    CategoryKind, Direction, LedgerRow, NewAccount, NewCategory, Transaction, TransactionDraft,
    TransactionId, UserId,
};
pub use error::AppError;
pub use service::{AccountService, CategoryService, RegisterService, ScanOutcome};
pub use store::{
    init_db, AccountStore, CategoryStore, MemoryStore, SqliteStore, StoreError, TransactionFilter,
    TransactionStore,
};
