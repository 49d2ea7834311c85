use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateGoalRequest, GoalView};
use super::{repo, services};
use crate::{
    auth::services::AuthUser, error::AppError, pagination::Pagination, state::AppState,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/current", get(current_goal))
}

#[instrument(skip(state, payload))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalView>), (StatusCode, String)> {
    let goal = services::submit(&state.db, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(goal.into())))
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<GoalView>>, (StatusCode, String)> {
    let (limit, offset) = p.window(20, 100);
    let goals = repo::list_for_user(&state.db, user_id, limit, offset)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(goals.into_iter().map(GoalView::from).collect()))
}

#[instrument(skip(state))]
pub async fn current_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalView>, (StatusCode, String)> {
    let goal = repo::latest_for_user(&state.db, user_id, None)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::NotFound("goal"))?;
    Ok(Json(goal.into()))
}
