use serde::{Deserialize, Serialize};

use crate::goals::dto::GoalView;
use crate::planner::assign::Selection;

/// Review actions available on a single goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Approve,
    Reject,
    AutoAssign,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: AdminAction,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub goal: GoalView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

/// Actions that can be applied to many goals at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub goal_ids: Vec<i64>,
    pub action: BulkAction,
}

#[derive(Debug, Serialize)]
pub struct BulkOutcome {
    pub goal_id: i64,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
