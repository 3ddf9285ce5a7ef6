use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
  error::Result,
  model::{fit, read_dataset, split_dataset, ClassifierConfig, TrainParams, TrainReport},
  utils::save_model,
};

pub struct Train {
  dataset_path: PathBuf,
  model_output_path: PathBuf,
  config: ClassifierConfig,
  params: TrainParams,
  /// Fraction of the dataset used for training; the rest is held out.
  train_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
  pub report: TrainReport,
  pub train_accuracy: f64,
  pub test_accuracy: Option<f64>,
}

impl Train {
  pub fn new(
    dataset_path: &Path,
    model_output_path: &Path,
    config: ClassifierConfig,
    params: TrainParams,
    train_ratio: Option<f64>,
  ) -> Self {
    Self {
      dataset_path: PathBuf::from(dataset_path),
      model_output_path: PathBuf::from(model_output_path),
      config,
      params,
      train_ratio,
    }
  }

  #[instrument(skip(self), fields(dataset = %self.dataset_path.display()))]
  pub fn run(self) -> Result<TrainSummary> {
    let data = read_dataset(&self.dataset_path)?;
    let (train, test) = match self.train_ratio {
      Some(ratio) => split_dataset(data, ratio),
      None => (data, Vec::new()),
    };
    info!(train = train.len(), test = test.len(), "loaded dataset");

    let (classifier, report) = fit(&self.config, &self.params, &train)?;
    let train_accuracy = classifier.accuracy(&train)?;
    let test_accuracy = if test.is_empty() {
      None
    } else {
      Some(classifier.accuracy(&test)?)
    };
    info!(train_accuracy, ?test_accuracy, "training done");

    save_model(&self.model_output_path, &classifier)?;
    info!("model written to {}", self.model_output_path.display());
    Ok(TrainSummary {
      report,
      train_accuracy,
      test_accuracy,
    })
  }
}
