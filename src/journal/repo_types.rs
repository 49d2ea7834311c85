use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: Uuid,
    pub workout_plan_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub workout_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub workout_end: OffsetDateTime,
    pub calories_burned: Option<f64>,
}

impl WorkoutSession {
    pub fn duration_minutes(&self) -> i64 {
        (self.workout_end - self.workout_start).whole_minutes()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DietRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub diet_plan_id: Option<i64>,
    pub date: Date,
    pub notes: Option<String>,
}
