use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::repo_types::{Goal, GoalStatus};
use crate::catalog::repo_types::DietType;

const COLUMNS: &str = "id, user_id, current_weight, target_weight, duration_days, diet_type, \
                       status, start_date, workout_plan_id, diet_plan_id, created_at, updated_at";

pub struct NewGoal {
    pub current_weight: f64,
    pub target_weight: f64,
    pub duration_days: i32,
    pub diet_type: DietType,
}

/// Inserts a pending goal starting today.
pub async fn insert_pending(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    g: &NewGoal,
) -> anyhow::Result<Goal> {
    let sql = format!(
        "INSERT INTO user_goals (user_id, current_weight, target_weight, duration_days, diet_type, status)
         VALUES ($1, $2, $3, $4, $5, 'pending')
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Goal>(&sql)
        .bind(user_id)
        .bind(g.current_weight)
        .bind(g.target_weight)
        .bind(g.duration_days)
        .bind(g.diet_type)
        .fetch_one(db)
        .await
        .context("insert goal")
}

pub async fn get(db: &PgPool, goal_id: i64) -> anyhow::Result<Option<Goal>> {
    let sql = format!("SELECT {COLUMNS} FROM user_goals WHERE id = $1");
    sqlx::query_as::<_, Goal>(&sql)
        .bind(goal_id)
        .fetch_optional(db)
        .await
        .context("get goal")
}

/// Most recent goal of the user, optionally restricted to one status.
pub async fn latest_for_user(
    db: &PgPool,
    user_id: Uuid,
    status: Option<GoalStatus>,
) -> anyhow::Result<Option<Goal>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM user_goals
         WHERE user_id = $1 AND ($2::goal_status IS NULL OR status = $2)
         ORDER BY id DESC
         LIMIT 1"
    );
    sqlx::query_as::<_, Goal>(&sql)
        .bind(user_id)
        .bind(status)
        .fetch_optional(db)
        .await
        .context("latest goal for user")
}

pub async fn list_for_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Goal>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM user_goals
         WHERE user_id = $1
         ORDER BY id DESC
         LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, Goal>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list goals for user")
}

/// Review queue: pending goals, newest start date first.
pub async fn list_pending(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Goal>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM user_goals
         WHERE status = 'pending'
         ORDER BY start_date DESC, id DESC
         LIMIT $1 OFFSET $2"
    );
    sqlx::query_as::<_, Goal>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list pending goals")
}

/// Moves the goal to `to` only if it is still in `from`.
/// `None` means another writer got there first.
pub async fn update_status(
    db: &PgPool,
    goal_id: i64,
    from: GoalStatus,
    to: GoalStatus,
) -> anyhow::Result<Option<Goal>> {
    let sql = format!(
        "UPDATE user_goals
            SET status = $3, updated_at = now()
          WHERE id = $1 AND status = $2
      RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Goal>(&sql)
        .bind(goal_id)
        .bind(from)
        .bind(to)
        .fetch_optional(db)
        .await
        .context("update goal status")
}

/// Sets both plan references and the status in a single statement.
pub async fn assign_plans(
    db: &PgPool,
    goal_id: i64,
    from: GoalStatus,
    to: GoalStatus,
    workout_plan_id: Option<i64>,
    diet_plan_id: Option<i64>,
) -> anyhow::Result<Option<Goal>> {
    let sql = format!(
        "UPDATE user_goals
            SET status = $3, workout_plan_id = $4, diet_plan_id = $5, updated_at = now()
          WHERE id = $1 AND status = $2
      RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Goal>(&sql)
        .bind(goal_id)
        .bind(from)
        .bind(to)
        .bind(workout_plan_id)
        .bind(diet_plan_id)
        .fetch_optional(db)
        .await
        .context("assign plans to goal")
}
