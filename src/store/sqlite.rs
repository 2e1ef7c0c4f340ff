//! SQLite-backed store implementation.

use crate::domain::{
    Account, AccountId, AccountKind, AccountPatch, Category, CategoryId, CategoryKind, LedgerRow,
    NewAccount, NewCategory, Transaction, TransactionId, UserId,
};
use crate::store::{AccountStore, CategoryStore, StoreError, TransactionFilter, TransactionStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

/// Persistent store backed by a sqlx SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }
}

fn decode_decimal(value: &str, field: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(value)
        .map_err(|e| StoreError::Decode(format!("{field} '{value}': {e}")))
}

fn decode_date(value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| StoreError::Decode(format!("date '{value}': {e}")))
}

fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("timestamp '{value}': {e}")))
}

fn account_from_row(row: &SqliteRow) -> Result<Account, StoreError> {
    let kind_label: String = row.get("kind");
    let initial_balance: String = row.get("initial_balance");
    let credit_limit: Option<String> = row.get("credit_limit");
    let created_at: String = row.get("created_at");

    Ok(Account {
        id: AccountId::new(row.get::<String, _>("id")),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        name: row.get("name"),
        bank: row.get("bank"),
        kind: kind_label
            .parse::<AccountKind>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        currency: row.get("currency"),
        initial_balance: decode_decimal(&initial_balance, "initial_balance")?,
        credit_limit: credit_limit
            .map(|v| decode_decimal(&v, "credit_limit"))
            .transpose()?,
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: decode_timestamp(&created_at)?,
    })
}

fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, StoreError> {
    let direction_label: String = row.get("direction");
    let date: String = row.get("date");
    let amount: String = row.get("amount");
    let created_at: String = row.get("created_at");

    Ok(Transaction {
        id: TransactionId::new(row.get::<String, _>("id")),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        account_id: AccountId::new(row.get::<String, _>("account_id")),
        related_account_id: row
            .get::<Option<String>, _>("related_account_id")
            .map(AccountId::new),
        date: decode_date(&date)?,
        description: row.get("description"),
        amount: decode_decimal(&amount, "amount")?,
        direction: direction_label
            .parse()
            .map_err(|e: crate::domain::ParseEnumError| StoreError::Decode(e.to_string()))?,
        category_id: row
            .get::<Option<String>, _>("category_id")
            .map(CategoryId::new),
        created_at: decode_timestamp(&created_at)?,
    })
}

fn category_from_row(row: &SqliteRow) -> Result<Category, StoreError> {
    let kind_label: String = row.get("kind");
    let created_at: String = row.get("created_at");

    Ok(Category {
        id: CategoryId::new(row.get::<String, _>("id")),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        name: row.get("name"),
        kind: kind_label
            .parse::<CategoryKind>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        created_at: decode_timestamp(&created_at)?,
    })
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn list_accounts(&self, user: &UserId) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, bank, kind, currency, initial_balance,
                   credit_limit, is_active, created_at
            FROM accounts
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(account_from_row).collect()
    }

    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, bank, kind, currency, initial_balance,
                   credit_limit, is_active, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn insert_account(&self, user: &UserId, new: NewAccount) -> Result<Account, StoreError> {
        let account = new.into_account(user.clone());

        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, user_id, name, bank, kind, currency, initial_balance,
                credit_limit, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.as_str())
        .bind(account.user_id.as_str())
        .bind(&account.name)
        .bind(&account.bank)
        .bind(account.kind.as_str())
        .bind(&account.currency)
        .bind(account.initial_balance.to_string())
        .bind(account.credit_limit.map(|d| d.to_string()))
        .bind(account.is_active as i64)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(account)
    }

    async fn update_account(
        &self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Account, StoreError> {
        let mut account = self
            .get_account(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("account '{}'", id)))?;
        patch.apply(&mut account);

        sqlx::query(
            r#"
            UPDATE accounts
            SET name = ?, bank = ?, kind = ?, currency = ?, initial_balance = ?,
                credit_limit = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&account.name)
        .bind(&account.bank)
        .bind(account.kind.as_str())
        .bind(&account.currency)
        .bind(account.initial_balance.to_string())
        .bind(account.credit_limit.map(|d| d.to_string()))
        .bind(account.is_active as i64)
        .bind(account.id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(account)
    }

    async fn set_active(&self, id: &AccountId, active: bool) -> Result<Account, StoreError> {
        self.update_account(
            id,
            AccountPatch {
                is_active: Some(active),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn list_transactions(
        &self,
        user: &UserId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT id, user_id, account_id, related_account_id, date,
                   description, amount, direction, category_id, created_at
            FROM transactions
            WHERE user_id = ?
            "#,
        );
        if filter.account_id.is_some() {
            sql.push_str(" AND account_id = ?");
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");
        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query(&sql).bind(user.as_str());
        if let Some(account_id) = &filter.account_id {
            query = query.bind(account_id.as_str());
        }
        if let Some(limit) = filter.limit {
            query = query.bind(limit as i64);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(transaction_from_row).collect()
    }

    async fn insert_batch(
        &self,
        user: &UserId,
        rows: &[LedgerRow],
    ) -> Result<Vec<Transaction>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let transactions: Vec<Transaction> = rows
            .iter()
            .map(|row| row.clone().into_transaction(user.clone()))
            .collect();

        // All rows in one database transaction: a transfer pair is written
        // as a unit or not at all.
        let mut db_tx = self.pool.begin().await.map_err(|source| {
            StoreError::BatchFailed {
                attempted: rows.len(),
                source,
            }
        })?;

        for tx in &transactions {
            let result = sqlx::query(
                r#"
                INSERT INTO transactions (
                    id, user_id, account_id, related_account_id, date,
                    description, amount, direction, category_id, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(tx.id.as_str())
            .bind(tx.user_id.as_str())
            .bind(tx.account_id.as_str())
            .bind(tx.related_account_id.as_ref().map(|id| id.as_str()))
            .bind(tx.date.to_string())
            .bind(&tx.description)
            .bind(tx.amount.to_string())
            .bind(tx.direction.as_str())
            .bind(tx.category_id.as_ref().map(|id| id.as_str()))
            .bind(tx.created_at.to_rfc3339())
            .execute(&mut *db_tx)
            .await;

            if let Err(source) = result {
                // Dropping db_tx rolls the whole batch back.
                return Err(StoreError::BatchFailed {
                    attempted: rows.len(),
                    source,
                });
            }
        }

        db_tx
            .commit()
            .await
            .map_err(|source| StoreError::BatchFailed {
                attempted: rows.len(),
                source,
            })?;

        Ok(transactions)
    }
}

#[async_trait]
impl CategoryStore for SqliteStore {
    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, kind, created_at
            FROM categories
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn insert_category(
        &self,
        user: &UserId,
        new: NewCategory,
    ) -> Result<Category, StoreError> {
        let category = new.into_category(user.clone());

        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, kind, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.as_str())
        .bind(category.user_id.as_str())
        .bind(&category.name)
        .bind(category.kind.as_str())
        .bind(category.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(category)
    }
}
