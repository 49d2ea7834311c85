use serde::Serialize;

use super::schedule::Schedule;
use crate::catalog::repo_types::{DietPlan, WorkoutPlan};
use crate::goals::dto::GoalView;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub goal: GoalView,
    pub workout_plan: Option<WorkoutPlan>,
    pub diet_plan: Option<DietPlan>,
    pub schedule: Schedule,
}
