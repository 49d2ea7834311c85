use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};

use super::dto::{ProfileResponse, UpdateProfileRequest};
use super::repo::{self, ProfileChanges};
use super::repo_types::UserProfile;
use crate::{
    auth::services::AuthUser,
    catalog,
    error::{AppError, AppResult},
    goals,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

fn validate(req: &UpdateProfileRequest) -> AppResult<()> {
    if let Some(age) = req.age {
        if !(1..=120).contains(&age) {
            return Err(AppError::validation("Age must be between 1 and 120"));
        }
    }
    for (name, v) in [("height_cm", req.height_cm), ("weight_kg", req.weight_kg)] {
        if let Some(v) = v {
            if !(v.is_finite() && v > 0.0) {
                return Err(AppError::validation(format!("{name} must be greater than zero")));
            }
        }
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = repo::get_or_create(&state.db, user_id)
        .await
        .map_err(AppError::Internal)?;
    let goal = goals::repo::latest_for_user(&state.db, user_id, None)
        .await
        .map_err(AppError::Internal)?;

    let (mut workout_plan, mut diet_plan) = (None, None);
    if let Some(g) = &goal {
        if let Some(id) = g.workout_plan_id {
            workout_plan = catalog::repo::get_workout(&state.db, id)
                .await
                .map_err(AppError::Internal)?;
        }
        if let Some(id) = g.diet_plan_id {
            diet_plan = catalog::repo::get_diet(&state.db, id)
                .await
                .map_err(AppError::Internal)?;
        }
    }

    Ok(Json(ProfileResponse {
        profile,
        goal: goal.map(Into::into),
        workout_plan,
        diet_plan,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    validate(&payload)?;
    let profile = repo::update(
        &state.db,
        user_id,
        ProfileChanges {
            age: payload.age,
            gender: payload.gender,
            height_cm: payload.height_cm,
            weight_kg: payload.weight_kg,
            diet_preference: payload.diet_preference,
            medical_issue: payload.medical_issue,
        },
    )
    .await
    .map_err(AppError::Internal)?;

    info!(%user_id, "profile updated");
    Ok(Json(profile))
}
