use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{DietQuery, WorkoutQuery};
use super::repo;
use super::repo_types::{DietPlan, WorkoutPlan};
use crate::{auth::services::AuthUser, error::AppError, state::AppState};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/workouts", get(list_workouts))
        .route("/plans/diets", get(list_diets))
}

#[instrument(skip(state, _user))]
pub async fn list_workouts(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<WorkoutQuery>,
) -> Result<Json<Vec<WorkoutPlan>>, (StatusCode, String)> {
    let plans = repo::list_workouts(&state.db, q.plan_type, q.level)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(plans))
}

#[instrument(skip(state, _user))]
pub async fn list_diets(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<DietQuery>,
) -> Result<Json<Vec<DietPlan>>, (StatusCode, String)> {
    let plans = repo::list_diets(&state.db, q.plan_type, q.diet_type, q.limit.clamp(1, 200))
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(plans))
}
