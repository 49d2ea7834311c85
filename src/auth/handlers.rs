use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        repo_types::User,
        services::{hash_password, is_valid_email, verify_password, AuthUser, JwtKeys},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn respond(state: &AppState, user: User) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let access_token = JwtKeys::from_ref(state)
        .sign(user.id, user.is_staff)
        .map_err(AppError::Internal)?;
    Ok(Json(AuthResponse {
        access_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            is_staff: user.is_staff,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }
    if !(1..=120).contains(&payload.age) {
        return Err((StatusCode::BAD_REQUEST, "Age must be between 1 and 120".into()));
    }

    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(AppError::Internal)?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(AppError::Internal)?;
    let user = User::create_with_profile(
        &state.db,
        &payload.email,
        &hash,
        payload.age,
        payload.gender,
        payload.diet_preference,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "create user failed");
        AppError::Internal(e)
    })?;

    info!(user_id = %user.id, "user registered");
    respond(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(AppError::Internal)?
    {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash).map_err(AppError::Internal)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    info!(user_id = %user.id, "user logged in");
    respond(&state, user)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
        is_staff: user.is_staff,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_hides_nothing_sensitive() {
        let json = serde_json::to_string(&PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".into(),
            is_staff: false,
        })
        .unwrap();
        assert!(json.contains("test@example.com"));
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn register_rejects_short_password_before_touching_db() {
        let state = AppState::fake();
        let err = register(
            State(state),
            Json(RegisterRequest {
                email: "new@example.com".into(),
                password: "short".into(),
                age: 30,
                gender: crate::profiles::repo_types::Gender::Female,
                diet_preference: crate::catalog::repo_types::DietType::Vegan,
            }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }
}
