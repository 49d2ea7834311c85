use anyhow::Context;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::dto::CreateGoalRequest;
use super::repo::{self, NewGoal};
use super::repo_types::{Goal, GoalStatus};
use crate::catalog::repo_types::DietType;
use crate::error::{AppError, AppResult};
use crate::notifications::GoalEvent;
use crate::profiles;

pub const MAX_DURATION_DAYS: i32 = 730;

/// Status changes a goal can undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject,
    Complete,
}

impl Transition {
    fn verb(self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Complete => "complete",
        }
    }
}

impl GoalStatus {
    /// `pending -> approved | rejected`, `approved -> completed`. Everything
    /// else is refused; rejected and completed are terminal.
    pub fn next(self, t: Transition) -> AppResult<GoalStatus> {
        match (self, t) {
            (GoalStatus::Pending, Transition::Approve) => Ok(GoalStatus::Approved),
            (GoalStatus::Pending, Transition::Reject) => Ok(GoalStatus::Rejected),
            (GoalStatus::Approved, Transition::Complete) => Ok(GoalStatus::Completed),
            (from, t) => Err(AppError::InvalidTransition {
                from,
                action: t.verb(),
            }),
        }
    }
}

fn positive_weight(name: &str, v: f64) -> AppResult<f64> {
    if v.is_finite() && v > 0.0 && v < 1000.0 {
        Ok(v)
    } else {
        Err(AppError::validation(format!(
            "{name} must be a positive number of kilograms"
        )))
    }
}

/// Checks a goal submission and fills the diet type from the profile when absent.
pub fn validate_intake(req: &CreateGoalRequest, profile_diet: DietType) -> AppResult<NewGoal> {
    let current_weight = positive_weight("current_weight", req.current_weight)?;
    let target_weight = positive_weight("target_weight", req.target_weight)?;
    if current_weight == target_weight {
        return Err(AppError::validation(
            "target_weight must differ from current_weight",
        ));
    }
    if !(1..=MAX_DURATION_DAYS).contains(&req.duration_days) {
        return Err(AppError::validation(format!(
            "duration_days must be between 1 and {MAX_DURATION_DAYS}"
        )));
    }
    if let Some(h) = req.height_cm {
        if !(h.is_finite() && h > 0.0) {
            return Err(AppError::validation("Height must be greater than zero"));
        }
    }
    Ok(NewGoal {
        current_weight,
        target_weight,
        duration_days: req.duration_days,
        diet_type: req.diet_type.unwrap_or(profile_diet),
    })
}

/// Stores a pending goal and refreshes the profile's body measurements in
/// the same transaction.
pub async fn submit(db: &PgPool, user_id: Uuid, req: CreateGoalRequest) -> AppResult<Goal> {
    let profile = profiles::repo::get_or_create(db, user_id).await?;
    let new_goal = validate_intake(&req, profile.diet_preference)?;

    let mut tx = db.begin().await.context("begin tx")?;
    let goal = repo::insert_pending(&mut *tx, user_id, &new_goal).await?;
    profiles::repo::set_body(&mut *tx, user_id, req.height_cm, new_goal.current_weight).await?;
    tx.commit().await.context("commit tx")?;

    info!(goal_id = goal.id, %user_id, goal_type = ?goal.goal_type(), "goal submitted");
    Ok(goal)
}

pub async fn load(db: &PgPool, goal_id: i64) -> AppResult<Goal> {
    repo::get(db, goal_id).await?.ok_or(AppError::NotFound("goal"))
}

fn event_for(goal: &Goal) -> GoalEvent {
    GoalEvent {
        goal_id: goal.id,
        user_id: goal.user_id,
        status: goal.status,
    }
}

/// Applies a status-only transition. The write is conditional on the status
/// read here, so of two concurrent reviewers only the first succeeds.
pub async fn transition(db: &PgPool, goal_id: i64, t: Transition) -> AppResult<(Goal, GoalEvent)> {
    let goal = load(db, goal_id).await?;
    let to = goal.status.next(t)?;
    let updated = repo::update_status(db, goal_id, goal.status, to)
        .await?
        .ok_or(AppError::Conflict(goal_id))?;

    info!(goal_id, from = %goal.status, to = %updated.status, "goal status changed");
    let event = event_for(&updated);
    Ok((updated, event))
}

/// Approves `goal` and records the selected plans together with the status.
pub async fn approve_with_plans(
    db: &PgPool,
    goal: &Goal,
    workout_plan_id: Option<i64>,
    diet_plan_id: Option<i64>,
) -> AppResult<(Goal, GoalEvent)> {
    let to = goal.status.next(Transition::Approve)?;
    let updated = repo::assign_plans(db, goal.id, goal.status, to, workout_plan_id, diet_plan_id)
        .await?
        .ok_or(AppError::Conflict(goal.id))?;

    info!(
        goal_id = goal.id,
        workout_plan_id = ?workout_plan_id,
        diet_plan_id = ?diet_plan_id,
        "plans assigned"
    );
    let event = event_for(&updated);
    Ok((updated, event))
}


#[cfg(test)]
mod storage_tests {
    use super::*;

    async fn user(db: &PgPool) -> Uuid {
        sqlx::query_scalar("INSERT INTO users (email, password_hash) VALUES ($1, 'x') RETURNING id")
            .bind(format!("{}@example.com", Uuid::new_v4()))
            .fetch_one(db)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn failed_profile_write_discards_the_goal(db: PgPool) {
        let user_id = user(&db).await;
        sqlx::query("ALTER TABLE user_profiles ADD CONSTRAINT weight_cap CHECK (weight_kg < 100)")
            .execute(&db)
            .await
            .unwrap();

        let req = CreateGoalRequest {
            current_weight: 150.0,
            target_weight: 120.0,
            duration_days: 30,
            diet_type: None,
            height_cm: Some(180.0),
        };
        assert!(submit(&db, user_id, req).await.is_err());

        let goals: i64 = sqlx::query_scalar("SELECT count(*) FROM user_goals WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(goals, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn submit_stores_goal_and_body_together(db: PgPool) {
        let user_id = user(&db).await;
        let req = CreateGoalRequest {
            current_weight: 82.0,
            target_weight: 75.0,
            duration_days: 60,
            diet_type: None,
            height_cm: Some(178.0),
        };
        let goal = submit(&db, user_id, req).await.unwrap();
        assert_eq!(goal.status, GoalStatus::Pending);

        let profile = profiles::repo::find(&db, user_id).await.unwrap().unwrap();
        assert_eq!(profile.weight_kg, Some(82.0));
        assert_eq!(profile.height_cm, Some(178.0));
    }
}
