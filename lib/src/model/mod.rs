pub mod classifier;
pub mod ops;
pub mod types;
pub mod utils;

use tracing::info;

pub use classifier::*;
pub use types::*;
pub use utils::*;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainParams {
  pub epochs: usize,
  pub learning_rate: f64,
  /// Log progress every this many epochs.
  pub log_every: usize,
}

impl Default for TrainParams {
  fn default() -> Self {
    Self {
      epochs: 100,
      learning_rate: 0.01,
      log_every: 10,
    }
  }
}

/// Builds a fresh classifier from `config` and trains it on `data`.
#[tracing::instrument(skip(data), fields(examples = data.len()))]
pub fn fit(
  config: &ClassifierConfig,
  params: &TrainParams,
  data: &[Example],
) -> Result<(Classifier, TrainReport)> {
  let mut classifier = Classifier::new(config)?;
  let start = std::time::Instant::now();
  let report = classifier.train_with(data, params)?;
  if report.steps > 0 {
    info!("Finished in {} iterations", report.steps);
    info!(
      "Took {:.2}s, {:.2}µs / iter",
      start.elapsed().as_secs_f32(),
      start.elapsed().as_micros() / report.steps as u128
    );
  }
  Ok((classifier, report))
}
