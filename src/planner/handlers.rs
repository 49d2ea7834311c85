use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{debug, instrument};

use super::dto::PlanResponse;
use super::schedule;
use crate::{
    auth::services::AuthUser,
    catalog,
    error::AppError,
    goals::{self, repo_types::GoalStatus},
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new().route("/plan", get(my_plan))
}

/// Schedule for the user's most recent approved goal.
#[instrument(skip(state))]
pub async fn my_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    let goal = goals::repo::latest_for_user(&state.db, user_id, Some(GoalStatus::Approved))
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::NotFound("approved goal"))?;

    let schedule = schedule::for_goal(&state.db, &goal).await?;
    let workout_plan = match goal.workout_plan_id {
        Some(id) => catalog::repo::get_workout(&state.db, id)
            .await
            .map_err(AppError::Internal)?,
        None => None,
    };
    let diet_plan = match goal.diet_plan_id {
        Some(id) => catalog::repo::get_diet(&state.db, id)
            .await
            .map_err(AppError::Internal)?,
        None => None,
    };

    debug!(goal_id = goal.id, days = schedule.days().len(), "schedule built");
    Ok(Json(PlanResponse {
        goal: goal.into(),
        workout_plan,
        diet_plan,
        schedule,
    }))
}
