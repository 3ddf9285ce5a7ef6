use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

#[cfg(not(debug_assertions))]
use human_panic::setup_panic;
use tracing::subscriber::{DefaultGuard, SetGlobalDefaultError};

#[cfg(debug_assertions)]
extern crate better_panic;

use tracing_subscriber::EnvFilter;

use crate::{
  error::Result,
  model::{Classifier, Parameters},
};

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn install_logger() -> Result<(), SetGlobalDefaultError> {
  let subscriber = tracing_subscriber::fmt()
    .compact()
    .with_env_filter(env_filter())
    .finish();
  tracing::subscriber::set_global_default(subscriber)
}

pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
  // Human Panic. Only enabled when *not* debugging.
  #[cfg(not(debug_assertions))]
  {
    setup_panic!();
  }

  // Better Panic. Only enabled *when* debugging.
  #[cfg(debug_assertions)]
  {
    better_panic::Settings::debug()
      .most_recent_first(false)
      .lineno_suffix(true)
      .verbosity(better_panic::Verbosity::Full)
      .install();
  }

  install_logger()?;

  Ok(())
}

/// Scoped subscriber for tests; logging stops when the guard drops.
pub fn init_logging_tests() -> DefaultGuard {
  let subscriber = tracing_subscriber::fmt()
    .compact()
    .with_test_writer()
    .with_max_level(tracing::Level::DEBUG)
    .finish();
  tracing::subscriber::set_default(subscriber)
}

pub fn serialize_to_file<T: Serialize>(path: &Path, obj: &T) -> Result<()> {
  let buff = serde_json::to_string_pretty(obj)?;
  std::fs::write(path, buff)?;
  Ok(())
}

pub fn deserialize_from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let content = std::fs::read_to_string(path)?;
  Ok(serde_json::from_str(&content)?)
}

/// Writes the classifier parameters as a JSON model file.
pub fn save_model(path: &Path, classifier: &Classifier) -> Result<()> {
  serialize_to_file(path, classifier.parameters())
}

/// Reads a JSON model file, rejecting parameters of the wrong shape.
pub fn load_model(path: &Path) -> Result<Classifier> {
  let params: Parameters = deserialize_from_file(path)?;
  Classifier::from_parameters(params)
}
