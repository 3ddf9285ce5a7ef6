use std::{error::Error, path::Path};

use clap::ValueEnum;
use quadrant::model::{ClassifierConfig, Init, TrainParams};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 4545;
const DEFAULT_INIT_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InitKind {
  Zeros,
  Uniform,
}

/// AppConfig - also defines the config file format (every field can be omitted).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
  /// Width of the hidden layer
  pub hidden_size: Option<usize>,
  pub epochs: Option<usize>,
  pub learning_rate: Option<f64>,
  /// Seed for weight initialisation
  pub seed: Option<u64>,
  pub init: Option<InitKind>,
  /// Half-width of the uniform initialisation range
  pub init_scale: Option<f64>,
  /// Log training progress every this many epochs
  pub log_every: Option<usize>,
  pub port: Option<u16>,
}

impl AppConfig {
  pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
  }

  // merge configs where the second overwrites the first
  pub fn merge(self, other: Self) -> Self {
    Self {
      hidden_size: other.hidden_size.or(self.hidden_size),
      epochs: other.epochs.or(self.epochs),
      learning_rate: other.learning_rate.or(self.learning_rate),
      seed: other.seed.or(self.seed),
      init: other.init.or(self.init),
      init_scale: other.init_scale.or(self.init_scale),
      log_every: other.log_every.or(self.log_every),
      port: other.port.or(self.port),
    }
  }

  pub fn classifier_config(&self) -> ClassifierConfig {
    let defaults = ClassifierConfig::default();
    let init = match self.init {
      Some(InitKind::Zeros) => Init::Zeros,
      Some(InitKind::Uniform) => Init::Uniform {
        scale: self.init_scale.unwrap_or(DEFAULT_INIT_SCALE),
      },
      None => match self.init_scale {
        Some(scale) => Init::Uniform { scale },
        None => defaults.init,
      },
    };
    ClassifierConfig {
      hidden_size: self.hidden_size.unwrap_or(defaults.hidden_size),
      init,
      seed: self.seed.unwrap_or(defaults.seed),
    }
  }

  pub fn train_params(&self) -> TrainParams {
    let defaults = TrainParams::default();
    TrainParams {
      epochs: self.epochs.unwrap_or(defaults.epochs),
      learning_rate: self.learning_rate.unwrap_or(defaults.learning_rate),
      log_every: self.log_every.unwrap_or(defaults.log_every),
    }
  }

  pub fn port(&self) -> u16 {
    self.port.unwrap_or(DEFAULT_PORT)
  }
}
