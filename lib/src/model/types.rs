use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// x and y
pub const INPUT_SIZE: usize = 2;
/// One output per quadrant label.
pub const OUTPUT_SIZE: usize = 4;
pub const DEFAULT_HIDDEN_SIZE: usize = 5;

/// Quadrant of the plane. The declaration order is the one-hot index and the
/// arg-max order used by prediction, so it must not be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
  NW,
  NE,
  SW,
  SE,
}

impl Label {
  pub const ALL: [Label; OUTPUT_SIZE] = [Label::NW, Label::NE, Label::SW, Label::SE];

  pub fn index(self) -> usize {
    match self {
      Label::NW => 0,
      Label::NE => 1,
      Label::SW => 2,
      Label::SE => 3,
    }
  }

  pub fn from_index(index: usize) -> Option<Self> {
    Self::ALL.get(index).copied()
  }

  pub fn one_hot(self) -> [f64; OUTPUT_SIZE] {
    let mut target = [0.0; OUTPUT_SIZE];
    target[self.index()] = 1.0;
    target
  }

  /// Ground truth for a coordinate. Points on an axis go to the East / North side.
  pub fn of_point(x: f64, y: f64) -> Self {
    match (x >= 0.0, y >= 0.0) {
      (false, true) => Label::NW,
      (true, true) => Label::NE,
      (false, false) => Label::SW,
      (true, false) => Label::SE,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Label::NW => "NW",
      Label::NE => "NE",
      Label::SW => "SW",
      Label::SE => "SE",
    }
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Label {
  type Err = ClassifierError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "NW" => Ok(Label::NW),
      "NE" => Ok(Label::NE),
      "SW" => Ok(Label::SW),
      "SE" => Ok(Label::SE),
      other => Err(ClassifierError::InvalidLabel(other.to_string())),
    }
  }
}

/// One-hot target for a textual label. Unknown labels are a hard error.
pub fn one_hot(label: &str) -> Result<[f64; OUTPUT_SIZE]> {
  Ok(label.parse::<Label>()?.one_hot())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Example {
  pub input: [f64; INPUT_SIZE],
  pub label: Label,
}

impl Example {
  pub fn new(x: f64, y: f64, label: Label) -> Self {
    Self { input: [x, y], label }
  }
}

pub type Dataset = Vec<Example>;
