use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo_types::{Goal, GoalStatus};
use crate::catalog::repo_types::{DietType, PlanType};

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub current_weight: f64,
    pub target_weight: f64,
    pub duration_days: i32,
    pub diet_type: Option<DietType>,
    pub height_cm: Option<f64>,
}

/// A goal as returned to clients, with the derived goal type.
#[derive(Debug, Serialize)]
pub struct GoalView {
    pub id: i64,
    pub current_weight: f64,
    pub target_weight: f64,
    pub goal_type: PlanType,
    pub duration_days: i32,
    pub diet_type: DietType,
    pub status: GoalStatus,
    pub start_date: Date,
    pub workout_plan_id: Option<i64>,
    pub diet_plan_id: Option<i64>,
    pub created_at: OffsetDateTime,
}

impl From<Goal> for GoalView {
    fn from(g: Goal) -> Self {
        Self {
            goal_type: g.goal_type(),
            id: g.id,
            current_weight: g.current_weight,
            target_weight: g.target_weight,
            duration_days: g.duration_days,
            diet_type: g.diet_type,
            status: g.status,
            start_date: g.start_date,
            workout_plan_id: g.workout_plan_id,
            diet_plan_id: g.diet_plan_id,
            created_at: g.created_at,
        }
    }
}
