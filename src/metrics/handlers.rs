use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{BmiRequest, BmiResponse, BodyFatRequest, BodyFatResponse};
use super::repo;
use super::repo_types::BmiRecord;
use super::services::{self, Dashboard, CHART_WINDOW};
use crate::{
    auth::services::AuthUser,
    error::{AppError, AppResult},
    pagination::Pagination,
    profiles::{self, repo_types::{Gender, UserProfile}},
    state::AppState,
};

pub fn metric_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(list_metrics))
        .route("/metrics/bmi", post(record_bmi))
        .route("/metrics/body-fat", post(estimate_body_fat))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip(state, payload))]
pub async fn record_bmi(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<BmiRequest>,
) -> Result<(StatusCode, Json<BmiResponse>), (StatusCode, String)> {
    let record = services::record_sample(&state.db, user_id, payload.weight, payload.height).await?;
    let profile = profiles::repo::get_or_create(&state.db, user_id)
        .await
        .map_err(AppError::Internal)?;
    let body_fat = services::body_fat(record.bmi, profile.age_or_default(), profile.gender);
    Ok((StatusCode::CREATED, Json(BmiResponse { record, body_fat })))
}

/// Body fat is estimated from the unrounded BMI; only the outputs are rounded.
fn body_fat_estimate(req: &BodyFatRequest) -> AppResult<BodyFatResponse> {
    let bmi = services::raw_bmi(req.weight, req.height)?;
    let age = req.age.unwrap_or(UserProfile::DEFAULT_AGE);
    let gender = req.gender.or(Some(Gender::Male));
    Ok(BodyFatResponse {
        bmi: services::round2(bmi),
        body_fat: services::body_fat(bmi, age, gender),
    })
}

/// Calculator only; nothing is stored.
#[instrument(skip(_user))]
pub async fn estimate_body_fat(
    _user: AuthUser,
    Json(payload): Json<BodyFatRequest>,
) -> Result<Json<BodyFatResponse>, (StatusCode, String)> {
    Ok(Json(body_fat_estimate(&payload)?))
}

#[instrument(skip(state))]
pub async fn list_metrics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<BmiRecord>>, (StatusCode, String)> {
    let (limit, offset) = p.window(20, 200);
    let rows = repo::list_recent(&state.db, user_id, limit, offset)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Dashboard>, (StatusCode, String)> {
    let profile = profiles::repo::get_or_create(&state.db, user_id)
        .await
        .map_err(AppError::Internal)?;
    let recent = repo::list_recent(&state.db, user_id, CHART_WINDOW, 0)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(services::summarize(
        &recent,
        profile.age_or_default(),
        profile.gender,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculator_defaults_to_male_age_25() {
        let out = body_fat_estimate(&BodyFatRequest {
            weight: 67.375,
            height: 175.0,
            age: None,
            gender: None,
        })
        .unwrap();
        assert_eq!(out.bmi, 22.0);
        assert!((out.body_fat - 15.95).abs() < 1e-9);
    }

    #[test]
    fn calculator_uses_unrounded_bmi_for_body_fat() {
        // 50 kg at 150 cm: BMI 22.222.., shown as 22.22. Rounding first would give 16.21.
        let out = body_fat_estimate(&BodyFatRequest {
            weight: 50.0,
            height: 150.0,
            age: None,
            gender: None,
        })
        .unwrap();
        assert_eq!(out.bmi, 22.22);
        assert!((out.body_fat - 16.22).abs() < 1e-9, "got {}", out.body_fat);
    }

    #[test]
    fn calculator_rejects_zero_height() {
        let err = body_fat_estimate(&BodyFatRequest {
            weight: 70.0,
            height: 0.0,
            age: Some(40),
            gender: Some(Gender::Female),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Height must be greater than zero");
    }
}
