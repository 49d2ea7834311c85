use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::repo_types::{BmiCategory, BmiRecord};

pub async fn insert(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    weight_kg: f64,
    height_cm: f64,
    bmi: f64,
    category: BmiCategory,
) -> anyhow::Result<BmiRecord> {
    sqlx::query_as::<_, BmiRecord>(
        r#"
        INSERT INTO bmi_records (user_id, weight_kg, height_cm, bmi, category)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, weight_kg, height_cm, bmi, category, created_at
        "#,
    )
    .bind(user_id)
    .bind(weight_kg)
    .bind(height_cm)
    .bind(bmi)
    .bind(category)
    .fetch_one(db)
    .await
    .context("insert bmi record")
}

/// Newest first.
pub async fn list_recent(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<BmiRecord>> {
    sqlx::query_as::<_, BmiRecord>(
        r#"
        SELECT id, user_id, weight_kg, height_cm, bmi, category, created_at
          FROM bmi_records
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list bmi records")
}

pub async fn latest(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<BmiRecord>> {
    Ok(list_recent(db, user_id, 1, 0).await?.into_iter().next())
}
