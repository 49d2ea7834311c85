use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::catalog::repo_types::{DietType, PlanType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Pending,
    #[serde(alias = "assigned")]
    Approved,
    Rejected,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Pending => "pending",
            GoalStatus::Approved => "approved",
            GoalStatus::Rejected => "rejected",
            GoalStatus::Completed => "completed",
        }
    }

    /// Capitalised form used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::Pending => "Pending",
            GoalStatus::Approved => "Approved",
            GoalStatus::Rejected => "Rejected",
            GoalStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub user_id: Uuid,
    pub current_weight: f64,
    pub target_weight: f64,
    pub duration_days: i32,
    pub diet_type: DietType,
    pub status: GoalStatus,
    pub start_date: Date,
    pub workout_plan_id: Option<i64>,
    pub diet_plan_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Goal {
    /// Derived from the two weights on every call; never stored.
    pub fn goal_type(&self) -> PlanType {
        goal_type_for(self.current_weight, self.target_weight)
    }
}

pub fn goal_type_for(current_weight: f64, target_weight: f64) -> PlanType {
    if target_weight < current_weight {
        PlanType::Loss
    } else {
        PlanType::Gain
    }
}

#[cfg(test)]
pub(crate) fn sample_goal(current: f64, target: f64) -> Goal {
    Goal {
        id: 1,
        user_id: Uuid::nil(),
        current_weight: current,
        target_weight: target,
        duration_days: 30,
        diet_type: DietType::Veg,
        status: GoalStatus::Pending,
        start_date: time::macros::date!(2025 - 01 - 06),
        workout_plan_id: None,
        diet_plan_id: None,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_type_follows_the_weights() {
        assert_eq!(sample_goal(70.0, 60.0).goal_type(), PlanType::Loss);
        assert_eq!(sample_goal(60.0, 70.0).goal_type(), PlanType::Gain);
    }

    #[test]
    fn goal_type_is_recomputed_after_edit() {
        let mut goal = sample_goal(70.0, 60.0);
        assert_eq!(goal.goal_type(), PlanType::Loss);
        goal.target_weight = 75.0;
        assert_eq!(goal.goal_type(), PlanType::Gain);
    }

    #[test]
    fn assigned_is_accepted_as_approved() {
        let status: GoalStatus = serde_json::from_str("\"assigned\"").unwrap();
        assert_eq!(status, GoalStatus::Approved);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"approved\"");
    }
}
