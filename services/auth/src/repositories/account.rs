//! Account queries for PostgreSQL

use staykey_common::error::{DatabaseError, DatabaseResult};
use tracing::debug;
use uuid::Uuid;

use super::{AccountStore, PgStore};
use crate::models::{Account, NewAccount, UpdateAccount};

impl AccountStore for PgStore {
    async fn find_account(&self, id: Uuid) -> DatabaseResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, name, phone, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> DatabaseResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, name, phone, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn list_accounts(&self) -> DatabaseResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, name, phone, password_hash, role, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn create_account(&self, new_account: &NewAccount) -> DatabaseResult<Account> {
        debug!("Creating account with role {}", new_account.role);

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (id, email, name, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, phone, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_account.email)
        .bind(&new_account.name)
        .bind(&new_account.phone)
        .bind(&new_account.password_hash)
        .bind(new_account.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    async fn update_account(&self, id: Uuid, changes: &UpdateAccount) -> DatabaseResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                phone = CASE WHEN $4 THEN $5 ELSE phone END,
                password_hash = COALESCE($6, password_hash),
                role = COALESCE($7, role)
            WHERE id = $1
            RETURNING id, email, name, phone, password_hash, role, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(changes.phone.is_some())
        .bind(changes.phone.clone().flatten())
        .bind(&changes.password_hash)
        .bind(changes.role)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or(DatabaseError::NotFound)
    }

    async fn delete_account(&self, id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
