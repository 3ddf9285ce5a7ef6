use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
  error::Result,
  model::{generate_dataset, write_dataset},
};

/// Writes a synthetic, correctly labelled dataset.
pub struct Generate {
  output_path: PathBuf,
  count: usize,
  range: f64,
  seed: u64,
}

impl Generate {
  pub fn new(output_path: &Path, count: usize, range: f64, seed: u64) -> Self {
    Self {
      output_path: PathBuf::from(output_path),
      count,
      range,
      seed,
    }
  }

  #[instrument(skip(self), fields(count = self.count, seed = self.seed))]
  pub fn run(self) -> Result<usize> {
    let data = generate_dataset(self.count, self.range, self.seed)?;
    write_dataset(&self.output_path, &data)?;
    info!("wrote {} examples to {}", data.len(), self.output_path.display());
    Ok(data.len())
  }
}
