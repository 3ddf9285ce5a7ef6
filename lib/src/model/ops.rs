//! Elementwise numeric pieces of the network.

use crate::error::{ClassifierError, Result};

pub fn relu(z: f64) -> f64 {
  if z > 0.0 {
    z
  } else {
    0.0
  }
}

/// Subgradient of ReLU with 0 at the kink.
pub fn relu_derivative(z: f64) -> f64 {
  if z > 0.0 {
    1.0
  } else {
    0.0
  }
}

/// Softmax in the shifted form: the maximum is subtracted before exponentiating.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
  let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
  let sum: f64 = exps.iter().sum();
  exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximal value.
pub fn argmax(values: &[f64]) -> usize {
  let mut best = 0;
  for (i, v) in values.iter().enumerate().skip(1) {
    if *v > values[best] {
      best = i;
    }
  }
  best
}

/// Mean squared error. Reported only; training never differentiates it.
pub fn mse_loss(output: &[f64], target: &[f64]) -> Result<f64> {
  if output.len() != target.len() {
    return Err(ClassifierError::DimensionMismatch {
      what: "loss target",
      expected: output.len(),
      actual: target.len(),
    });
  }
  if output.is_empty() {
    return Ok(0.0);
  }
  let sum: f64 = output.iter().zip(target).map(|(o, t)| (o - t).powi(2)).sum();
  Ok(sum / output.len() as f64)
}
