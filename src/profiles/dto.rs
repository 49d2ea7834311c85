use serde::{Deserialize, Serialize};

use super::repo_types::{Gender, UserProfile};
use crate::catalog::repo_types::{DietPlan, DietType, WorkoutPlan};
use crate::goals::dto::GoalView;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub diet_preference: Option<DietType>,
    pub medical_issue: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub goal: Option<GoalView>,
    pub workout_plan: Option<WorkoutPlan>,
    pub diet_plan: Option<DietPlan>,
}
