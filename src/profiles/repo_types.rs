use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::catalog::repo_types::DietType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub diet_preference: DietType,
    pub medical_issue: Option<String>,
}

impl UserProfile {
    pub const DEFAULT_AGE: i32 = 25;

    /// Age used by the estimators when the profile has none.
    pub fn age_or_default(&self) -> i32 {
        self.age.unwrap_or(Self::DEFAULT_AGE)
    }
}
