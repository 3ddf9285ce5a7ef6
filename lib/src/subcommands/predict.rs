use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
  error::Result,
  model::Label,
  utils::load_model,
};

pub struct Predict {
  model_path: PathBuf,
  x: f64,
  y: f64,
}

impl Predict {
  pub fn new(model_path: &Path, x: f64, y: f64) -> Self {
    Self {
      model_path: PathBuf::from(model_path),
      x,
      y,
    }
  }

  #[instrument(skip(self), fields(x = self.x, y = self.y))]
  pub fn run(self) -> Result<Label> {
    let classifier = load_model(&self.model_path)?;
    let (label, probabilities) = classifier.classify(self.x, self.y)?;
    debug!(?probabilities);
    Ok(label)
  }
}
