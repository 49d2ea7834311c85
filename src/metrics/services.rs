//! BMI, body-fat estimate and trend computation.
//!
//! The body-fat figure uses the linear adult approximation
//! `1.20*BMI + 0.23*age - 10.8*sex - 5.4` (sex = 1 for male, 0 otherwise).
//! It is a rough population estimate, not a clinical measurement.

use anyhow::Context;
use serde::Serialize;
use sqlx::PgPool;
use time::macros::format_description;
use tracing::info;
use uuid::Uuid;

use super::repo;
use super::repo_types::{BmiCategory, BmiRecord};
use crate::error::{AppError, AppResult};
use crate::profiles::{self, repo_types::Gender};

/// BMI assumed when the user has never recorded a sample.
pub const DEFAULT_BMI: f64 = 22.0;
/// Number of samples shown on the dashboard chart.
pub const CHART_WINDOW: i64 = 7;

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `weight / (height in metres)^2`, unrounded.
pub fn raw_bmi(weight_kg: f64, height_cm: f64) -> AppResult<f64> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::validation("Height must be greater than zero"));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::validation("Weight must be greater than zero"));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// [`raw_bmi`] rounded to two decimals, the stored form.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> AppResult<f64> {
    raw_bmi(weight_kg, height_cm).map(round2)
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn is_heavy(self) -> bool {
        matches!(self, BmiCategory::Overweight | BmiCategory::Obese)
    }
}

fn sex_factor(gender: Option<Gender>) -> f64 {
    match gender {
        Some(Gender::Male) => 1.0,
        Some(Gender::Female) | None => 0.0,
    }
}

pub fn body_fat(bmi: f64, age: i32, gender: Option<Gender>) -> f64 {
    round2(1.20 * bmi + 0.23 * f64::from(age) - 10.8 * sex_factor(gender) - 5.4)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
}

impl Trend {
    pub fn between(previous: f64, latest: f64) -> Self {
        if latest > previous {
            Trend::Up
        } else if latest < previous {
            Trend::Down
        } else {
            Trend::Same
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub latest_bmi: f64,
    pub latest_body_fat: f64,
    pub bmi_trend: Trend,
    pub body_fat_trend: Trend,
    pub chart_labels: Vec<String>,
    pub bmi_data: Vec<f64>,
    pub body_fat_data: Vec<f64>,
}

/// Builds the dashboard from samples given newest first.
pub fn summarize(newest_first: &[BmiRecord], age: i32, gender: Option<Gender>) -> Dashboard {
    let label_format = format_description!("[day] [month repr:short]");
    let window: Vec<&BmiRecord> = newest_first
        .iter()
        .take(CHART_WINDOW as usize)
        .rev()
        .collect();

    let bmi_data: Vec<f64> = window.iter().map(|r| r.bmi).collect();
    let body_fat_data: Vec<f64> = bmi_data.iter().map(|&b| body_fat(b, age, gender)).collect();
    let chart_labels = window
        .iter()
        .map(|r| r.created_at.format(&label_format).unwrap_or_default())
        .collect();

    let latest_bmi = bmi_data.last().copied().unwrap_or(DEFAULT_BMI);
    let latest_body_fat = body_fat(latest_bmi, age, gender);

    let (bmi_trend, body_fat_trend) = match bmi_data.len() {
        n if n >= 2 => (
            Trend::between(bmi_data[n - 2], bmi_data[n - 1]),
            Trend::between(body_fat_data[n - 2], body_fat_data[n - 1]),
        ),
        _ => (Trend::Same, Trend::Same),
    };

    Dashboard {
        latest_bmi,
        latest_body_fat,
        bmi_trend,
        body_fat_trend,
        chart_labels,
        bmi_data,
        body_fat_data,
    }
}

/// Validates and stores a sample, then mirrors the measurements onto the profile.
/// Both writes share one transaction; nothing is written when the input is invalid.
pub async fn record_sample(
    db: &PgPool,
    user_id: Uuid,
    weight_kg: f64,
    height_cm: f64,
) -> AppResult<BmiRecord> {
    let bmi = compute_bmi(weight_kg, height_cm)?;
    let category = BmiCategory::from_bmi(bmi);

    let mut tx = db.begin().await.context("begin tx")?;
    let record = repo::insert(&mut *tx, user_id, weight_kg, height_cm, bmi, category).await?;
    profiles::repo::set_body(&mut *tx, user_id, Some(height_cm), weight_kg).await?;
    tx.commit().await.context("commit tx")?;

    info!(%user_id, bmi, category = ?category, "bmi recorded");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(bmi: f64, created_at: time::OffsetDateTime) -> BmiRecord {
        BmiRecord {
            id: 0,
            user_id: None,
            weight_kg: 70.0,
            height_cm: 175.0,
            bmi,
            category: BmiCategory::from_bmi(bmi),
            created_at,
        }
    }

    #[test]
    fn bmi_formula() {
        assert_eq!(compute_bmi(70.0, 175.0).unwrap(), 22.86);
        assert_eq!(compute_bmi(81.0, 180.0).unwrap(), 25.0);
    }

    #[test]
    fn bmi_rejects_non_positive_input() {
        assert!(matches!(compute_bmi(70.0, 0.0), Err(AppError::Validation(_))));
        assert!(matches!(compute_bmi(70.0, -150.0), Err(AppError::Validation(_))));
        assert!(matches!(compute_bmi(0.0, 170.0), Err(AppError::Validation(_))));
        assert!(compute_bmi(f64::NAN, 170.0).is_err());
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(17.9), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn body_fat_example() {
        let bf = body_fat(22.0, 25, Some(Gender::Male));
        assert!((bf - 15.95).abs() < 1e-9, "got {bf}");
        let bf = body_fat(22.0, 25, Some(Gender::Female));
        assert!((bf - 26.75).abs() < 1e-9, "got {bf}");
    }

    #[test]
    fn trend_directions() {
        assert_eq!(Trend::between(22.0, 23.0), Trend::Up);
        assert_eq!(Trend::between(23.0, 22.0), Trend::Down);
        assert_eq!(Trend::between(22.0, 22.0), Trend::Same);
    }

    #[test]
    fn empty_history_uses_default_bmi() {
        let d = summarize(&[], 25, Some(Gender::Male));
        assert_eq!(d.latest_bmi, DEFAULT_BMI);
        assert!((d.latest_body_fat - 15.95).abs() < 1e-9);
        assert_eq!(d.bmi_trend, Trend::Same);
        assert!(d.chart_labels.is_empty());
    }

    #[test]
    fn trends_compare_two_most_recent_samples() {
        let newest_first = vec![
            record(24.0, datetime!(2025-03-03 08:00 UTC)),
            record(25.5, datetime!(2025-03-02 08:00 UTC)),
            record(23.0, datetime!(2025-03-01 08:00 UTC)),
        ];
        let d = summarize(&newest_first, 30, None);
        assert_eq!(d.latest_bmi, 24.0);
        assert_eq!(d.bmi_trend, Trend::Down);
        assert_eq!(d.body_fat_trend, Trend::Down);
        assert_eq!(d.bmi_data, vec![23.0, 25.5, 24.0]);
        assert_eq!(d.chart_labels, vec!["01 Mar", "02 Mar", "03 Mar"]);
    }

    #[test]
    fn chart_keeps_last_seven_samples() {
        let newest_first: Vec<BmiRecord> = (0..10)
            .map(|i| record(30.0 - f64::from(i), datetime!(2025-03-01 08:00 UTC)))
            .collect();
        let d = summarize(&newest_first, 25, None);
        assert_eq!(d.bmi_data.len(), CHART_WINDOW as usize);
        assert_eq!(d.bmi_data.first(), Some(&24.0));
        assert_eq!(d.bmi_data.last(), Some(&30.0));
        assert_eq!(d.bmi_trend, Trend::Up);
    }
}
