use std::{fmt::Write as _, path::Path};

use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{Dataset, Example, Label};
use crate::error::{ClassifierError, Result};

/// Parses the text dataset format: one `<x> <y> <LABEL>` per line.
/// Blank lines and `#` comments are skipped.
pub fn parse_dataset(content: &str) -> Result<Dataset> {
  let mut examples = Vec::new();
  for (idx, line) in content.lines().enumerate() {
    let line_no = idx + 1;
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      continue;
    }
    let (x, y, label) = trimmed
      .split_whitespace()
      .collect_tuple()
      .ok_or_else(|| ClassifierError::Dataset {
        line: line_no,
        reason: format!("expected `<x> <y> <LABEL>`, got {trimmed:?}"),
      })?;
    let coordinate = |raw: &str| -> Result<f64> {
      match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ClassifierError::Dataset {
          line: line_no,
          reason: format!("{raw:?} is not a finite number"),
        }),
      }
    };
    examples.push(Example::new(coordinate(x)?, coordinate(y)?, label.parse()?));
  }
  Ok(examples)
}

pub fn read_dataset(path: &Path) -> Result<Dataset> {
  let content = std::fs::read_to_string(path)?;
  parse_dataset(&content)
}

pub fn format_dataset(examples: &[Example]) -> String {
  let mut out = String::new();
  for e in examples {
    // writing to a String cannot fail
    let _ = writeln!(out, "{} {} {}", e.input[0], e.input[1], e.label);
  }
  out
}

pub fn write_dataset(path: &Path, examples: &[Example]) -> Result<()> {
  std::fs::write(path, format_dataset(examples))?;
  Ok(())
}

/// Order-preserving split: the first `floor(len * ratio)` examples train, the rest test.
pub fn split_dataset(mut examples: Dataset, ratio: f64) -> (Dataset, Dataset) {
  let ratio = ratio.clamp(0.0, 1.0);
  let splitting_point = (examples.len() as f64 * ratio) as usize;
  let test = examples.split_off(splitting_point);
  (examples, test)
}

/// Seeded points drawn uniformly from `[-range, range)` on both axes and
/// labelled with their true quadrant.
pub fn generate_dataset(count: usize, range: f64, seed: u64) -> Result<Dataset> {
  // the sampler needs the width `2 * range` to be finite too
  if !(range > 0.0 && (2.0 * range).is_finite()) {
    return Err(ClassifierError::InvalidConfig(format!(
      "range must be positive with a finite width, got {range}"
    )));
  }
  let mut rng = StdRng::seed_from_u64(seed);
  Ok(
    (0..count)
      .map(|_| {
        let x = rng.gen_range(-range..range);
        let y = rng.gen_range(-range..range);
        Example::new(x, y, Label::of_point(x, y))
      })
      .collect(),
  )
}

/// Bias-corrected exponential moving average.
pub struct ExponentialAverage {
  beta: f64,
  moment: f64,
  pub value: f64,
  t: i32,
}

impl ExponentialAverage {
  pub fn new(initial: f64) -> Self {
    ExponentialAverage {
      beta: 0.999,
      moment: 0.,
      value: initial,
      t: 0,
    }
  }

  pub fn update(&mut self, value: f64) {
    self.t = self.t.saturating_add(1);
    self.moment = self.beta * self.moment + (1. - self.beta) * value;
    self.value = self.moment / (1. - self.beta.powi(self.t));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_lines_and_skips_comments() {
    let data = parse_dataset("# x y label\n1 1 NE\n\n  -2.5 3 NW \n-1 -1 SW\n").unwrap();
    assert_eq!(
      data,
      vec![
        Example::new(1.0, 1.0, Label::NE),
        Example::new(-2.5, 3.0, Label::NW),
        Example::new(-1.0, -1.0, Label::SW),
      ]
    );
  }

  #[test]
  fn reports_line_of_malformed_row() {
    match parse_dataset("1 1 NE\n1 NE\n") {
      Err(ClassifierError::Dataset { line, .. }) => assert_eq!(line, 2),
      other => panic!("unexpected {other:?}"),
    }
    match parse_dataset("1 1 NE\n2 2 NE\nx 1 SW\n") {
      Err(ClassifierError::Dataset { line, .. }) => assert_eq!(line, 3),
      other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
      parse_dataset("nan 1 NE\n"),
      Err(ClassifierError::Dataset { line: 1, .. })
    ));
  }

  #[test]
  fn unknown_label_in_file_is_invalid_label() {
    assert!(matches!(
      parse_dataset("1 1 NE\n1 -1 S\n"),
      Err(ClassifierError::InvalidLabel(label)) if label == "S"
    ));
  }

  #[test]
  fn written_dataset_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.txt");
    let data = generate_dataset(25, 10.0, 3).unwrap();
    write_dataset(&path, &data).unwrap();
    assert_eq!(read_dataset(&path).unwrap(), data);
  }

  #[test]
  fn split_keeps_order() {
    let data = generate_dataset(10, 1.0, 1).unwrap();
    let (train, test) = split_dataset(data.clone(), 0.8);
    assert_eq!(train.len(), 8);
    assert_eq!(test.len(), 2);
    assert_eq!([train, test].concat(), data);

    let (train, test) = split_dataset(data, 1.5);
    assert_eq!((train.len(), test.len()), (10, 0));
  }

  #[test]
  fn generated_points_are_labelled_and_seeded() {
    let a = generate_dataset(100, 5.0, 9).unwrap();
    assert_eq!(a, generate_dataset(100, 5.0, 9).unwrap());
    assert_ne!(a, generate_dataset(100, 5.0, 10).unwrap());
    for e in &a {
      assert!(e.input.iter().all(|v| (-5.0..5.0).contains(v)));
      assert_eq!(e.label, Label::of_point(e.input[0], e.input[1]));
    }
    assert!(generate_dataset(1, 0.0, 0).is_err());
    assert!(matches!(
      generate_dataset(3, f64::MAX, 1),
      Err(ClassifierError::InvalidConfig(_))
    ));
    assert_eq!(generate_dataset(3, f64::MAX / 4.0, 1).unwrap().len(), 3);
  }

  #[test]
  fn average_is_bias_corrected() {
    let mut avg = ExponentialAverage::new(1.0);
    avg.update(0.5);
    assert!((avg.value - 0.5).abs() < 1e-9);
    avg.update(0.5);
    assert!((avg.value - 0.5).abs() < 1e-9);
  }
}
