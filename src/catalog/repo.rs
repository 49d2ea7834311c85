use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{DietDay, DietPlan, DietType, PlanType, WorkoutDay, WorkoutLevel, WorkoutPlan};

const WORKOUT_COLUMNS: &str = "id, title, plan_type, level, workout_description";
const DIET_COLUMNS: &str =
    "id, title, plan_type, diet_type, calories, meals, medical_issue_suitable";

/// Workouts filtered by type and, optionally, level. Lowest id first.
pub async fn list_workouts(
    db: &PgPool,
    plan_type: Option<PlanType>,
    level: Option<WorkoutLevel>,
) -> anyhow::Result<Vec<WorkoutPlan>> {
    let sql = format!(
        "SELECT {WORKOUT_COLUMNS} FROM workout_plans
         WHERE ($1::plan_type IS NULL OR plan_type = $1)
           AND ($2::workout_level IS NULL OR level = $2)
         ORDER BY id ASC"
    );
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(plan_type)
        .bind(level)
        .fetch_all(db)
        .await
        .context("list workout plans")
}

/// Diets filtered by type and diet, capped at `limit`. Lowest id first.
pub async fn list_diets(
    db: &PgPool,
    plan_type: Option<PlanType>,
    diet_type: Option<DietType>,
    limit: i64,
) -> anyhow::Result<Vec<DietPlan>> {
    let sql = format!(
        "SELECT {DIET_COLUMNS} FROM diet_plans
         WHERE ($1::plan_type IS NULL OR plan_type = $1)
           AND ($2::diet_type IS NULL OR diet_type = $2)
         ORDER BY id ASC
         LIMIT $3"
    );
    sqlx::query_as::<_, DietPlan>(&sql)
        .bind(plan_type)
        .bind(diet_type)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("list diet plans")
}

pub async fn first_workout(
    db: &PgPool,
    plan_type: PlanType,
    level: Option<WorkoutLevel>,
) -> anyhow::Result<Option<WorkoutPlan>> {
    Ok(list_workouts(db, Some(plan_type), level).await?.into_iter().next())
}

pub async fn get_workout(db: &PgPool, id: i64) -> anyhow::Result<Option<WorkoutPlan>> {
    let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workout_plans WHERE id = $1");
    sqlx::query_as::<_, WorkoutPlan>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("get workout plan")
}

pub async fn get_diet(db: &PgPool, id: i64) -> anyhow::Result<Option<DietPlan>> {
    let sql = format!("SELECT {DIET_COLUMNS} FROM diet_plans WHERE id = $1");
    sqlx::query_as::<_, DietPlan>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("get diet plan")
}

pub async fn workout_days(db: &PgPool, plan_id: i64) -> anyhow::Result<Vec<WorkoutDay>> {
    sqlx::query_as::<_, WorkoutDay>(
        r#"
        SELECT plan_id, day_number, exercises
          FROM workout_days
         WHERE plan_id = $1
         ORDER BY day_number ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(db)
    .await
    .context("list workout days")
}

pub async fn diet_days(db: &PgPool, plan_id: i64) -> anyhow::Result<Vec<DietDay>> {
    sqlx::query_as::<_, DietDay>(
        r#"
        SELECT plan_id, day_number, breakfast, mid_morning_snack, lunch, evening_snack, dinner
          FROM diet_days
         WHERE plan_id = $1
         ORDER BY day_number ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(db)
    .await
    .context("list diet days")
}
