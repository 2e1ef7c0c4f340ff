//! Spending/income categories. Purely descriptive; the balance engine
//! never looks at them.

use crate::domain::{CategoryId, CategoryKind, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-defined category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: DateTime<Utc>,
}

/// Fields the user supplies when creating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
}

impl NewCategory {
    /// Materialize a full `Category` for the given owner.
    pub fn into_category(self, user_id: UserId) -> Category {
        Category {
            id: CategoryId::generate(),
            user_id,
            name: self.name,
            kind: self.kind,
            created_at: Utc::now(),
        }
    }
}
