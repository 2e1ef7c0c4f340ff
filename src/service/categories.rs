//! Category management.

use crate::auth::UserSession;
use crate::domain::{Category, NewCategory};
use crate::engine::FieldError;
use crate::error::AppError;
use crate::store::CategoryStore;
use std::sync::Arc;

/// Category listing and creation for the acting user.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    session: Arc<UserSession>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>, session: Arc<UserSession>) -> Self {
        CategoryService {
            categories,
            session,
        }
    }

    /// All of the user's categories.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let user = self.session.current_user_id().await?;
        Ok(self.categories.list_categories(&user).await?)
    }

    /// Create a category for the user.
    pub async fn create_category(&self, new: NewCategory) -> Result<Category, AppError> {
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidInput(FieldError {
                field: "name",
                message: "category name must not be empty".to_string(),
            }));
        }
        let user = self.session.current_user_id().await?;
        Ok(self.categories.insert_category(&user, new).await?)
    }
}
