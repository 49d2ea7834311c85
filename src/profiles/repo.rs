use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::repo_types::UserProfile;
use crate::catalog::repo_types::DietType;
use crate::profiles::repo_types::Gender;

const COLUMNS: &str = "user_id, age, gender, height_cm, weight_kg, diet_preference, medical_issue";

/// Returns the user's profile, inserting an empty one on first access.
pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<UserProfile> {
    sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(db)
        .await
        .context("ensure profile")?;

    let sql = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("load profile")
}

/// Read-only lookup; `None` when the user never stored a profile.
pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let sql = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find profile")
}

pub struct ProfileChanges {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub diet_preference: Option<DietType>,
    pub medical_issue: Option<String>,
}

/// Applies the provided fields; `None` keeps the stored value.
pub async fn update(db: &PgPool, user_id: Uuid, c: ProfileChanges) -> anyhow::Result<UserProfile> {
    get_or_create(db, user_id).await?;
    let sql = format!(
        "UPDATE user_profiles
            SET age = COALESCE($2, age),
                gender = COALESCE($3, gender),
                height_cm = COALESCE($4, height_cm),
                weight_kg = COALESCE($5, weight_kg),
                diet_preference = COALESCE($6, diet_preference),
                medical_issue = COALESCE($7, medical_issue)
          WHERE user_id = $1
      RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .bind(c.age)
        .bind(c.gender)
        .bind(c.height_cm)
        .bind(c.weight_kg)
        .bind(c.diet_preference)
        .bind(c.medical_issue)
        .fetch_one(db)
        .await
        .context("update profile")
}

/// Records the latest measured body size on the profile, creating the row if
/// needed. A single statement, so it can join the caller's transaction.
pub async fn set_body(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    height_cm: Option<f64>,
    weight_kg: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, height_cm, weight_kg)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
           SET height_cm = COALESCE(EXCLUDED.height_cm, user_profiles.height_cm),
               weight_kg = EXCLUDED.weight_kg
        "#,
    )
    .bind(user_id)
    .bind(height_cm)
    .bind(weight_kg)
    .execute(db)
    .await
    .context("set profile body")?;
    Ok(())
}
