use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{
    ActionRequest, ActionResponse, AdminAction, BulkAction, BulkOutcome, BulkRequest,
};
use crate::{
    auth::services::StaffUser,
    error::{AppError, AppResult},
    goals::{self, dto::GoalView, repo_types::Goal, services::Transition},
    notifications::{dispatch_goal_event, GoalEvent},
    pagination::Pagination,
    planner::assign::{self, Selection},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/goals", get(pending_goals))
        .route("/admin/goals/bulk", post(bulk_action))
        .route("/admin/goals/:id/actions", post(goal_action))
        .route("/admin/goals/:id/suggestion", get(suggest_plans))
        .route("/admin/goals/:id/complete", post(complete_goal))
}

async fn apply(
    state: &AppState,
    goal_id: i64,
    action: AdminAction,
) -> AppResult<(Goal, Option<Selection>, Option<GoalEvent>)> {
    match action {
        AdminAction::Approve => {
            let (goal, event) =
                goals::services::transition(&state.db, goal_id, Transition::Approve).await?;
            Ok((goal, None, Some(event)))
        }
        AdminAction::Reject => {
            let (goal, event) =
                goals::services::transition(&state.db, goal_id, Transition::Reject).await?;
            Ok((goal, None, Some(event)))
        }
        AdminAction::AutoAssign => {
            let (goal, selection, event) = assign::auto_assign(&state.db, goal_id).await?;
            Ok((goal, Some(selection), event))
        }
    }
}

#[instrument(skip(state))]
pub async fn pending_goals(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<GoalView>>, (StatusCode, String)> {
    let (limit, offset) = p.window(50, 200);
    let goals = goals::repo::list_pending(&state.db, limit, offset)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(goals.into_iter().map(GoalView::from).collect()))
}

#[instrument(skip(state))]
pub async fn goal_action(
    State(state): State<AppState>,
    StaffUser(staff_id): StaffUser,
    Path(goal_id): Path<i64>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, (StatusCode, String)> {
    let (goal, selection, event) = apply(&state, goal_id, req.action).await?;
    info!(goal_id, %staff_id, action = ?req.action, status = %goal.status, "admin action applied");
    if let Some(event) = event {
        dispatch_goal_event(&state, event);
    }

    Ok(Json(ActionResponse {
        goal: goal.into(),
        selection,
    }))
}

/// Approve or reject several goals; each id succeeds or fails on its own.
#[instrument(skip(state, req))]
pub async fn bulk_action(
    State(state): State<AppState>,
    StaffUser(staff_id): StaffUser,
    Json(req): Json<BulkRequest>,
) -> Result<Json<Vec<BulkOutcome>>, (StatusCode, String)> {
    if req.goal_ids.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "goal_ids must not be empty".into()));
    }
    let action = match req.action {
        BulkAction::Approve => AdminAction::Approve,
        BulkAction::Reject => AdminAction::Reject,
    };

    let mut outcomes = Vec::with_capacity(req.goal_ids.len());
    for goal_id in req.goal_ids {
        match apply(&state, goal_id, action).await {
            Ok((_, _, event)) => {
                if let Some(event) = event {
                    dispatch_goal_event(&state, event);
                }
                outcomes.push(BulkOutcome {
                    goal_id,
                    ok: true,
                    error: None,
                });
            }
            Err(e) => {
                warn!(goal_id, error = %e, "bulk action skipped goal");
                let (_, msg): (StatusCode, String) = e.into();
                outcomes.push(BulkOutcome {
                    goal_id,
                    ok: false,
                    error: Some(msg),
                });
            }
        }
    }
    info!(%staff_id, action = ?action, count = outcomes.len(), "bulk action finished");
    Ok(Json(outcomes))
}

/// What auto-assign would pick right now, without changing the goal.
#[instrument(skip(state))]
pub async fn suggest_plans(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(goal_id): Path<i64>,
) -> Result<Json<Selection>, (StatusCode, String)> {
    let goal = goals::services::load(&state.db, goal_id).await?;
    Ok(Json(assign::select_plans(&state.db, &goal).await?))
}

#[instrument(skip(state))]
pub async fn complete_goal(
    State(state): State<AppState>,
    StaffUser(staff_id): StaffUser,
    Path(goal_id): Path<i64>,
) -> Result<Json<GoalView>, (StatusCode, String)> {
    let (goal, event) =
        goals::services::transition(&state.db, goal_id, Transition::Complete).await?;
    info!(goal_id, %staff_id, "goal completed");
    dispatch_goal_event(&state, event);
    Ok(Json(goal.into()))
}
