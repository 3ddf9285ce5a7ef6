use thiserror::Error;

/// Everything that can go wrong while building, training or querying a classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
  /// A label outside `{NW, NE, SW, SE}`.
  #[error("invalid label: {0:?}")]
  InvalidLabel(String),

  #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
  DimensionMismatch {
    what: &'static str,
    expected: usize,
    actual: usize,
  },

  #[error("non-finite input: {0:?}")]
  NonFiniteInput(Vec<f64>),

  /// A finite input that drove a layer's pre-activations out of `f64` range.
  #[error("numeric overflow in the {layer} layer for input {input:?}")]
  NumericOverflow { layer: &'static str, input: Vec<f64> },

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("dataset line {line}: {reason}")]
  Dataset { line: usize, reason: String },

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("request error: {0}")]
  Request(#[from] reqwest::Error),

  #[error("server replied {status}: {body}")]
  Server { status: u16, body: String },
}

pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;
