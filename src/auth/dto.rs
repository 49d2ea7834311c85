use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::repo_types::DietType;
use crate::profiles::repo_types::Gender;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub age: i32,
    pub gender: Gender,
    pub diet_preference: DietType,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub is_staff: bool,
}
