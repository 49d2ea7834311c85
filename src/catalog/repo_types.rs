use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Direction of a plan or goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Gain,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workout_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkoutLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "diet_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    #[default]
    Veg,
    NonVeg,
    Vegan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlan {
    pub id: i64,
    pub title: String,
    pub plan_type: PlanType,
    pub level: WorkoutLevel,
    pub workout_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DietPlan {
    pub id: i64,
    pub title: String,
    pub plan_type: PlanType,
    pub diet_type: DietType,
    pub calories: i32,
    pub meals: String, // breakfast, snacks, lunch, dinner; one per line
    pub medical_issue_suitable: Option<String>,
}

/// Exercises for one day of a workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkoutDay {
    pub plan_id: i64,
    pub day_number: i32,
    pub exercises: String,
}

/// Meals for one day of a diet plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DietDay {
    pub plan_id: i64,
    pub day_number: i32,
    pub breakfast: String,
    pub mid_morning_snack: String,
    pub lunch: String,
    pub evening_snack: String,
    pub dinner: String,
}
