use anyhow::Context;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{DietRecord, WorkoutSession};

pub async fn insert_session(
    db: &PgPool,
    user_id: Uuid,
    workout_plan_id: Option<i64>,
    start: OffsetDateTime,
    end: OffsetDateTime,
    calories_burned: Option<f64>,
) -> anyhow::Result<WorkoutSession> {
    sqlx::query_as::<_, WorkoutSession>(
        r#"
        INSERT INTO workout_sessions (user_id, workout_plan_id, workout_start, workout_end, calories_burned)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, workout_plan_id, workout_start, workout_end, calories_burned
        "#,
    )
    .bind(user_id)
    .bind(workout_plan_id)
    .bind(start)
    .bind(end)
    .bind(calories_burned)
    .fetch_one(db)
    .await
    .context("insert workout session")
}

pub async fn list_sessions(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<WorkoutSession>> {
    sqlx::query_as::<_, WorkoutSession>(
        r#"
        SELECT id, user_id, workout_plan_id, workout_start, workout_end, calories_burned
          FROM workout_sessions
         WHERE user_id = $1
         ORDER BY workout_start DESC, id DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list workout sessions")
}

pub async fn insert_diet_record(
    db: &PgPool,
    user_id: Uuid,
    diet_plan_id: Option<i64>,
    date: Date,
    notes: Option<&str>,
) -> anyhow::Result<DietRecord> {
    sqlx::query_as::<_, DietRecord>(
        r#"
        INSERT INTO diet_records (user_id, diet_plan_id, date, notes)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, diet_plan_id, date, notes
        "#,
    )
    .bind(user_id)
    .bind(diet_plan_id)
    .bind(date)
    .bind(notes)
    .fetch_one(db)
    .await
    .context("insert diet record")
}

pub async fn list_diet_records(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<DietRecord>> {
    sqlx::query_as::<_, DietRecord>(
        r#"
        SELECT id, user_id, diet_plan_id, date, notes
          FROM diet_records
         WHERE user_id = $1
         ORDER BY date DESC, id DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list diet records")
}
