use serde::Deserialize;

use super::repo_types::{DietType, PlanType, WorkoutLevel};

#[derive(Debug, Deserialize)]
pub struct WorkoutQuery {
    pub plan_type: Option<PlanType>,
    pub level: Option<WorkoutLevel>,
}

#[derive(Debug, Deserialize)]
pub struct DietQuery {
    pub plan_type: Option<PlanType>,
    pub diet_type: Option<DietType>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    50
}
