use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::dto::{LogDietRequest, LogWorkoutRequest, WorkoutSessionView};
use super::repo;
use super::repo_types::DietRecord;
use crate::{
    auth::services::AuthUser,
    catalog,
    error::{AppError, AppResult},
    pagination::Pagination,
    state::AppState,
};

pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/journal/workouts", get(list_workouts).post(log_workout))
        .route("/journal/diet", get(list_diet).post(log_diet))
}

async fn ensure_workout_plan(state: &AppState, id: Option<i64>) -> AppResult<()> {
    if let Some(id) = id {
        catalog::repo::get_workout(&state.db, id)
            .await?
            .ok_or(AppError::NotFound("workout plan"))?;
    }
    Ok(())
}

async fn ensure_diet_plan(state: &AppState, id: Option<i64>) -> AppResult<()> {
    if let Some(id) = id {
        catalog::repo::get_diet(&state.db, id)
            .await?
            .ok_or(AppError::NotFound("diet plan"))?;
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn log_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<LogWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutSessionView>), (StatusCode, String)> {
    payload.validate()?;
    ensure_workout_plan(&state, payload.workout_plan_id).await?;

    let session = repo::insert_session(
        &state.db,
        user_id,
        payload.workout_plan_id,
        payload.workout_start,
        payload.workout_end,
        payload.calories_burned,
    )
    .await
    .map_err(AppError::Internal)?;

    info!(%user_id, session_id = session.id, "workout session logged");
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<WorkoutSessionView>>, (StatusCode, String)> {
    let (limit, offset) = p.window(20, 100);
    let sessions = repo::list_sessions(&state.db, user_id, limit, offset)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// Diet records are dated today (UTC).
#[instrument(skip(state, payload))]
pub async fn log_diet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<LogDietRequest>,
) -> Result<(StatusCode, Json<DietRecord>), (StatusCode, String)> {
    ensure_diet_plan(&state, payload.diet_plan_id).await?;

    let notes = payload
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let record = repo::insert_diet_record(
        &state.db,
        user_id,
        payload.diet_plan_id,
        OffsetDateTime::now_utc().date(),
        notes,
    )
    .await
    .map_err(AppError::Internal)?;

    info!(%user_id, record_id = record.id, "diet record logged");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn list_diet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<DietRecord>>, (StatusCode, String)> {
    let (limit, offset) = p.window(20, 100);
    let records = repo::list_diet_records(&state.db, user_id, limit, offset)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[tokio::test]
    async fn invalid_session_is_rejected_before_storage() {
        let state = AppState::fake();
        let err = log_workout(
            State(state),
            AuthUser(uuid::Uuid::new_v4()),
            Json(LogWorkoutRequest {
                workout_plan_id: None,
                workout_start: datetime!(2025-02-01 10:00 UTC),
                workout_end: datetime!(2025-02-01 09:00 UTC),
                calories_burned: None,
            }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }
}
