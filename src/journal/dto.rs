use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::WorkoutSession;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LogWorkoutRequest {
    pub workout_plan_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub workout_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub workout_end: OffsetDateTime,
    pub calories_burned: Option<f64>,
}

impl LogWorkoutRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.workout_end < self.workout_start {
            return Err(AppError::validation("Workout end must not precede its start"));
        }
        if let Some(c) = self.calories_burned {
            if !c.is_finite() || c < 0.0 {
                return Err(AppError::validation("Calories burned must not be negative"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct WorkoutSessionView {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub duration_minutes: i64,
}

impl From<WorkoutSession> for WorkoutSessionView {
    fn from(session: WorkoutSession) -> Self {
        Self {
            duration_minutes: session.duration_minutes(),
            session,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogDietRequest {
    pub diet_plan_id: Option<i64>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn request(start: OffsetDateTime, end: OffsetDateTime, calories: Option<f64>) -> LogWorkoutRequest {
        LogWorkoutRequest {
            workout_plan_id: None,
            workout_start: start,
            workout_end: end,
            calories_burned: calories,
        }
    }

    #[test]
    fn end_before_start_is_rejected() {
        let r = request(
            datetime!(2025-02-01 10:00 UTC),
            datetime!(2025-02-01 09:30 UTC),
            None,
        );
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn zero_length_session_is_allowed() {
        let t = datetime!(2025-02-01 10:00 UTC);
        assert!(request(t, t, Some(0.0)).validate().is_ok());
    }

    #[test]
    fn negative_calories_rejected() {
        let r = request(
            datetime!(2025-02-01 09:00 UTC),
            datetime!(2025-02-01 10:00 UTC),
            Some(-5.0),
        );
        assert!(r.validate().is_err());
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let r: LogWorkoutRequest = serde_json::from_str(
            r#"{"workout_start":"2025-02-01T09:00:00Z","workout_end":"2025-02-01T09:45:00+00:00","calories_burned":320.5}"#,
        )
        .unwrap();
        assert!(r.validate().is_ok());
        assert_eq!(r.workout_plan_id, None);
    }

    #[test]
    fn view_reports_duration() {
        let view = WorkoutSessionView::from(WorkoutSession {
            id: 1,
            user_id: uuid::Uuid::nil(),
            workout_plan_id: Some(2),
            workout_start: datetime!(2025-02-01 09:00 UTC),
            workout_end: datetime!(2025-02-01 09:45 UTC),
            calories_burned: None,
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["duration_minutes"], 45);
        assert_eq!(json["workout_plan_id"], 2);
        assert_eq!(json["workout_start"], "2025-02-01T09:00:00Z");
    }
}
