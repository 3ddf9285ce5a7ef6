use serde::{Deserialize, Serialize};

use crate::model::Label;

/// Body of `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PredictRequest {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictResponse {
  pub label: Label,
  /// In `Label::ALL` order.
  pub probabilities: Vec<f64>,
}
