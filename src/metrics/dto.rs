use serde::{Deserialize, Serialize};

use super::repo_types::BmiRecord;
use crate::profiles::repo_types::Gender;

#[derive(Debug, Deserialize)]
pub struct BmiRequest {
    pub weight: f64, // kg
    pub height: f64, // cm
}

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub record: BmiRecord,
    pub body_fat: f64,
}

#[derive(Debug, Deserialize)]
pub struct BodyFatRequest {
    pub weight: f64,
    pub height: f64,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Serialize)]
pub struct BodyFatResponse {
    pub bmi: f64,
    pub body_fat: f64,
}

