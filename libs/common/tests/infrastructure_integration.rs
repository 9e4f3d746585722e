//! Integration tests against a live PostgreSQL
//!
//! Ignored by default; run with `--ignored` once `DATABASE_URL` points at a
//! disposable database.

use sqlx::Row;
use staykey_common::database::{DatabaseConfig, ensure_schema, health_check, init_pool};

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn schema_applies_cleanly_and_concurrently() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    // Applying the schema must be idempotent, also when two services start together
    ensure_schema(&pool).await?;
    let (first, second) = tokio::join!(ensure_schema(&pool), ensure_schema(&pool));
    first?;
    second?;

    for table in ["users", "apartments", "visits", "key_codes"] {
        let row = sqlx::query(
            "SELECT COUNT(*) AS found FROM information_schema.tables WHERE table_name = $1",
        )
        .bind(table)
        .fetch_one(&pool)
        .await?;

        let found: i64 = row.get("found");
        assert_eq!(found, 1, "table {} is missing", table);
    }

    Ok(())
}
