//! Stay queries for PostgreSQL

use chrono::{DateTime, Utc};
use staykey_common::error::{DatabaseError, DatabaseResult};
use uuid::Uuid;

use super::{PgStore, StayStore};
use crate::models::{NewStay, Stay};

impl StayStore for PgStore {
    async fn list_stays(&self) -> DatabaseResult<Vec<Stay>> {
        let stays = sqlx::query_as::<_, Stay>(
            r#"
            SELECT id, user_id, apartment_id, check_in, check_out, notes, created_at
            FROM visits
            ORDER BY check_in DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    async fn stays_for_account(&self, account_id: Uuid) -> DatabaseResult<Vec<Stay>> {
        let stays = sqlx::query_as::<_, Stay>(
            r#"
            SELECT id, user_id, apartment_id, check_in, check_out, notes, created_at
            FROM visits
            WHERE user_id = $1
            ORDER BY check_in DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    async fn stays_for_apartment(&self, apartment_id: Uuid) -> DatabaseResult<Vec<Stay>> {
        let stays = sqlx::query_as::<_, Stay>(
            r#"
            SELECT id, user_id, apartment_id, check_in, check_out, notes, created_at
            FROM visits
            WHERE apartment_id = $1
            ORDER BY check_in DESC
            "#,
        )
        .bind(apartment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    async fn active_stays(&self, account_id: Uuid, now: DateTime<Utc>) -> DatabaseResult<Vec<Stay>> {
        let stays = sqlx::query_as::<_, Stay>(
            r#"
            SELECT id, user_id, apartment_id, check_in, check_out, notes, created_at
            FROM visits
            WHERE user_id = $1
              AND check_in <= $2
              AND (check_out IS NULL OR check_out >= $2)
            ORDER BY check_in DESC, created_at DESC, id DESC
            "#,
        )
        .bind(account_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    async fn create_stay(&self, new_stay: &NewStay) -> DatabaseResult<Stay> {
        let stay = sqlx::query_as::<_, Stay>(
            r#"
            INSERT INTO visits (id, user_id, apartment_id, check_in, check_out, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, apartment_id, check_in, check_out, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_stay.account_id)
        .bind(new_stay.apartment_id)
        .bind(new_stay.check_in)
        .bind(new_stay.check_out)
        .bind(&new_stay.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(stay)
    }

    async fn delete_stay(&self, id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
