//! Domain primitives: entity ids and the closed direction/kind enums.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a stored enum label is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unknown {kind} label: '{value}'")]
pub struct ParseEnumError {
    /// Enum family the label belonged to (e.g. "direction").
    pub kind: &'static str,
    /// The offending label.
    pub value: String,
}

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
        )]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Generate a fresh random (UUID v4) identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4().to_string())
            }

            /// Get the identifier as a string reference.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier carries no value (unset draft field).
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Identifier of the owning user; every read and write is scoped by it.
    UserId
);
id_newtype!(
    /// Identifier of a bank account.
    AccountId
);
id_newtype!(
    /// Identifier of a persisted ledger row.
    TransactionId
);
id_newtype!(
    /// Identifier of a spending/income category.
    CategoryId
);

/// The effect a transaction has on its account's balance.
///
/// Sign is derived entirely from the direction; stored amounts are
/// non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Money leaving the account.
    Expense,
    /// Money entering the account.
    Income,
    /// Outbound leg of a transfer pair.
    TransferOut,
    /// Inbound leg of a transfer pair; never direct user input.
    TransferIn,
}

impl Direction {
    /// True when the direction adds to the account balance.
    pub fn is_inflow(&self) -> bool {
        match self {
            Direction::Income | Direction::TransferIn => true,
            Direction::Expense | Direction::TransferOut => false,
        }
    }

    /// Signed multiplier for this direction (+1 inflow, -1 outflow).
    pub fn sign(&self) -> i32 {
        if self.is_inflow() {
            1
        } else {
            -1
        }
    }

    /// Stable storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Expense => "expense",
            Direction::Income => "income",
            Direction::TransferOut => "transfer_out",
            Direction::TransferIn => "transfer_in",
        }
    }
}

impl FromStr for Direction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Direction::Expense),
            "income" => Ok(Direction::Income),
            "transfer_out" => Ok(Direction::TransferOut),
            "transfer_in" => Ok(Direction::TransferIn),
            other => Err(ParseEnumError {
                kind: "direction",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account classification. A `Credit` account typically carries a negative
/// or zero balance; the balance engine does not special-case it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Debit,
    Credit,
    Savings,
    Cash,
    Other,
}

impl AccountKind {
    /// Stable storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Debit => "debit",
            AccountKind::Credit => "credit",
            AccountKind::Savings => "savings",
            AccountKind::Cash => "cash",
            AccountKind::Other => "other",
        }
    }
}

impl FromStr for AccountKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(AccountKind::Debit),
            "credit" => Ok(AccountKind::Credit),
            "savings" => Ok(AccountKind::Savings),
            "cash" => Ok(AccountKind::Cash),
            "other" => Ok(AccountKind::Other),
            other => Err(ParseEnumError {
                kind: "account kind",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category classification; descriptive only, never used in balance math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Expense,
    Income,
    Mixed,
}

impl CategoryKind {
    /// Stable storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
            CategoryKind::Mixed => "mixed",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(CategoryKind::Expense),
            "income" => Ok(CategoryKind::Income),
            "mixed" => Ok(CategoryKind::Mixed),
            other => Err(ParseEnumError {
                kind: "category kind",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Income.sign(), 1);
        assert_eq!(Direction::TransferIn.sign(), 1);
        assert_eq!(Direction::Expense.sign(), -1);
        assert_eq!(Direction::TransferOut.sign(), -1);
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::TransferOut).unwrap();
        assert_eq!(json, "\"transfer_out\"");

        let parsed: Direction = serde_json::from_str("\"income\"").unwrap();
        assert_eq!(parsed, Direction::Income);
    }

    #[test]
    fn test_direction_round_trip_labels() {
        for d in [
            Direction::Expense,
            Direction::Income,
            Direction::TransferOut,
            Direction::TransferIn,
        ] {
            assert_eq!(d.as_str().parse::<Direction>().unwrap(), d);
        }
    }

    #[test]
    fn test_unknown_direction_label_rejected() {
        let err = "traspaso".parse::<Direction>().unwrap_err();
        assert_eq!(err.kind, "direction");
        assert_eq!(err.value, "traspaso");
    }

    #[test]
    fn test_account_kind_labels() {
        assert_eq!("credit".parse::<AccountKind>().unwrap(), AccountKind::Credit);
        assert!("checking".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_empty_id_detection() {
        assert!(AccountId::new("").is_empty());
        assert!(AccountId::new("   ").is_empty());
        assert!(!AccountId::new("acc-1").is_empty());
    }
}
