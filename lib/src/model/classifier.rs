use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
  ops::{argmax, mse_loss, relu, relu_derivative, softmax},
  utils::ExponentialAverage,
  Example, Label, TrainParams, DEFAULT_HIDDEN_SIZE, INPUT_SIZE, OUTPUT_SIZE,
};
use crate::error::{ClassifierError, Result};

/// How the weight matrices are filled at construction. Biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Init {
  /// Every weight is zero. Hidden units never activate, so only the output
  /// biases ever move during training.
  Zeros,
  /// Seeded uniform samples from `[-scale, scale)`.
  Uniform { scale: f64 },
}

impl Default for Init {
  fn default() -> Self {
    Init::Uniform { scale: 0.5 }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
  pub hidden_size: usize,
  pub init: Init,
  pub seed: u64,
}

impl Default for ClassifierConfig {
  fn default() -> Self {
    Self {
      hidden_size: DEFAULT_HIDDEN_SIZE,
      init: Init::default(),
      seed: 42,
    }
  }
}

/// Network parameters, laid out row-major per receiving unit:
/// `weights_input_hidden` is `hidden x INPUT_SIZE`, `weights_hidden_output` is
/// `OUTPUT_SIZE x hidden`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
  pub weights_input_hidden: Vec<Vec<f64>>,
  pub weights_hidden_output: Vec<Vec<f64>>,
  pub biases_hidden: Vec<f64>,
  pub biases_output: Vec<f64>,
}

impl Parameters {
  pub fn zeros(hidden_size: usize) -> Self {
    Self {
      weights_input_hidden: vec![vec![0.0; INPUT_SIZE]; hidden_size],
      weights_hidden_output: vec![vec![0.0; hidden_size]; OUTPUT_SIZE],
      biases_hidden: vec![0.0; hidden_size],
      biases_output: vec![0.0; OUTPUT_SIZE],
    }
  }

  pub fn uniform(hidden_size: usize, scale: f64, seed: u64) -> Self {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = |rows: usize, cols: usize| -> Vec<Vec<f64>> {
      (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-scale..scale)).collect())
        .collect()
    };
    let weights_input_hidden = matrix(hidden_size, INPUT_SIZE);
    let weights_hidden_output = matrix(OUTPUT_SIZE, hidden_size);
    Self {
      weights_input_hidden,
      weights_hidden_output,
      biases_hidden: vec![0.0; hidden_size],
      biases_output: vec![0.0; OUTPUT_SIZE],
    }
  }

  pub fn hidden_size(&self) -> usize {
    self.biases_hidden.len()
  }

  fn validate(&self) -> Result<()> {
    let hidden = self.hidden_size();
    if hidden == 0 {
      return Err(ClassifierError::InvalidConfig("hidden layer must not be empty".into()));
    }
    check_len("weights_input_hidden rows", hidden, self.weights_input_hidden.len())?;
    for row in &self.weights_input_hidden {
      check_len("weights_input_hidden columns", INPUT_SIZE, row.len())?;
    }
    check_len("weights_hidden_output rows", OUTPUT_SIZE, self.weights_hidden_output.len())?;
    for row in &self.weights_hidden_output {
      check_len("weights_hidden_output columns", hidden, row.len())?;
    }
    check_len("biases_output", OUTPUT_SIZE, self.biases_output.len())
  }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
  if expected == actual {
    Ok(())
  } else {
    Err(ClassifierError::DimensionMismatch {
      what,
      expected,
      actual,
    })
  }
}

/// Intermediate values of one forward pass, kept for backpropagation.
#[derive(Debug, Clone)]
struct Activations {
  hidden_pre: Vec<f64>,
  hidden: Vec<f64>,
  probabilities: Vec<f64>,
}

/// Diagnostics of a single update, measured before the parameters moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
  /// Mean squared error between the prediction and the one-hot target.
  pub loss: f64,
  pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainReport {
  pub epochs: usize,
  pub steps: usize,
  /// Moving average of the per-step loss.
  pub loss: f64,
  /// Moving average of per-step correctness.
  pub accuracy: f64,
}

/// Feed-forward network `INPUT_SIZE -> hidden (ReLU) -> OUTPUT_SIZE (softmax)`.
///
/// Parameter shapes are fixed at construction; every constructor validates
/// them and nothing afterwards can resize them.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
  params: Parameters,
}

impl Classifier {
  pub fn new(config: &ClassifierConfig) -> Result<Self> {
    if config.hidden_size == 0 {
      return Err(ClassifierError::InvalidConfig("hidden_size must be > 0".into()));
    }
    let params = match config.init {
      Init::Zeros => Parameters::zeros(config.hidden_size),
      Init::Uniform { scale } => {
        if !(scale.is_finite() && scale > 0.0) {
          return Err(ClassifierError::InvalidConfig(format!(
            "init scale must be finite and > 0, got {scale}"
          )));
        }
        Parameters::uniform(config.hidden_size, scale, config.seed)
      }
    };
    Ok(Self { params })
  }

  pub fn zeroed(hidden_size: usize) -> Result<Self> {
    Self::from_parameters(Parameters::zeros(hidden_size))
  }

  pub fn from_parameters(params: Parameters) -> Result<Self> {
    params.validate()?;
    Ok(Self { params })
  }

  pub fn parameters(&self) -> &Parameters {
    &self.params
  }

  pub fn hidden_size(&self) -> usize {
    self.params.hidden_size()
  }

  /// Probability of each label, in [`Label::ALL`] order.
  pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
    validate_input(input)?;
    Ok(self.activations(input)?.probabilities)
  }

  /// Arg-max label; ties go to the label listed first in [`Label::ALL`].
  pub fn predict(&self, x: f64, y: f64) -> Result<Label> {
    Ok(self.classify(x, y)?.0)
  }

  /// Predicted label together with the full distribution it was taken from.
  pub fn classify(&self, x: f64, y: f64) -> Result<(Label, Vec<f64>)> {
    let probabilities = self.forward(&[x, y])?;
    let label = Label::from_index(argmax(&probabilities)).ok_or(ClassifierError::DimensionMismatch {
      what: "probabilities",
      expected: OUTPUT_SIZE,
      actual: probabilities.len(),
    })?;
    Ok((label, probabilities))
  }

  /// One stochastic gradient descent update from a single example.
  ///
  /// The output error is `probabilities - one_hot(label)`, the gradient of
  /// softmax + cross-entropy with respect to the output pre-activations.
  /// Hidden errors are taken from the hidden->output weights as they were
  /// before this step.
  pub fn train_step(
    &mut self,
    input: &[f64],
    label: Label,
    learning_rate: f64,
  ) -> Result<StepReport> {
    validate_input(input)?;
    validate_learning_rate(learning_rate)?;
    self.apply_step(input, label, learning_rate)
  }

  /// Runs `epochs` passes over `examples` in the given order.
  pub fn train(
    &mut self,
    examples: &[Example],
    epochs: usize,
    learning_rate: f64,
  ) -> Result<TrainReport> {
    self.train_with(
      examples,
      &TrainParams {
        epochs,
        learning_rate,
        ..TrainParams::default()
      },
    )
  }

  /// Like [`Classifier::train`], with progress logged every `params.log_every` epochs.
  pub fn train_with(&mut self, examples: &[Example], params: &TrainParams) -> Result<TrainReport> {
    validate_learning_rate(params.learning_rate)?;
    for example in examples {
      validate_input(&example.input)?;
    }

    // a step that overflows mid-run rolls the whole run back
    let snapshot = self.params.clone();
    let result = self.run_epochs(examples, params);
    if result.is_err() {
      self.params = snapshot;
    }
    result
  }

  fn run_epochs(&mut self, examples: &[Example], params: &TrainParams) -> Result<TrainReport> {
    let mut loss_avg = ExponentialAverage::new(0.0);
    let mut acc_avg = ExponentialAverage::new(0.0);
    let log_every = params.log_every.max(1);
    let mut steps = 0;
    for epoch in 0..params.epochs {
      for example in examples {
        let report = self.apply_step(&example.input, example.label, params.learning_rate)?;
        loss_avg.update(report.loss);
        acc_avg.update(if report.correct { 1.0 } else { 0.0 });
        steps += 1;
      }
      if (epoch + 1) % log_every == 0 {
        info!(
          "epoch {}/{} loss {:.4} acc {:.3}",
          epoch + 1,
          params.epochs,
          loss_avg.value,
          acc_avg.value
        );
      }
    }

    Ok(TrainReport {
      epochs: params.epochs,
      steps,
      loss: loss_avg.value,
      accuracy: acc_avg.value,
    })
  }

  /// Fraction of `examples` predicted correctly; 0 for an empty slice.
  pub fn accuracy(&self, examples: &[Example]) -> Result<f64> {
    if examples.is_empty() {
      return Ok(0.0);
    }
    let mut correct = 0;
    for example in examples {
      if self.predict(example.input[0], example.input[1])? == example.label {
        correct += 1;
      }
    }
    Ok(correct as f64 / examples.len() as f64)
  }

  /// Mean of [`mse_loss`] over `examples`; 0 for an empty slice.
  pub fn mean_loss(&self, examples: &[Example]) -> Result<f64> {
    if examples.is_empty() {
      return Ok(0.0);
    }
    let mut total = 0.0;
    for example in examples {
      let output = self.forward(&example.input)?;
      total += mse_loss(&output, &example.label.one_hot())?;
    }
    Ok(total / examples.len() as f64)
  }

  /// Fails with `NumericOverflow` when a layer leaves `f64` range, so callers
  /// never see NaN probabilities.
  fn activations(&self, input: &[f64]) -> Result<Activations> {
    let p = &self.params;
    let hidden_pre: Vec<f64> = p
      .weights_input_hidden
      .iter()
      .zip(&p.biases_hidden)
      .map(|(row, bias)| row.iter().zip(input).fold(*bias, |sum, (w, x)| sum + x * w))
      .collect();
    check_finite("hidden", input, &hidden_pre)?;
    let hidden: Vec<f64> = hidden_pre.iter().map(|z| relu(*z)).collect();
    let logits: Vec<f64> = p
      .weights_hidden_output
      .iter()
      .zip(&p.biases_output)
      .map(|(row, bias)| row.iter().zip(&hidden).fold(*bias, |sum, (w, h)| sum + h * w))
      .collect();
    check_finite("output", input, &logits)?;
    Ok(Activations {
      hidden_pre,
      hidden,
      probabilities: softmax(&logits),
    })
  }

  /// Inputs must already be validated.
  fn apply_step(&mut self, input: &[f64], label: Label, lr: f64) -> Result<StepReport> {
    let act = self.activations(input)?;
    let target = label.one_hot();
    let hidden_size = self.hidden_size();

    let output_error: Vec<f64> = act
      .probabilities
      .iter()
      .zip(&target)
      .map(|(p, t)| p - t)
      .collect();
    let hidden_error: Vec<f64> = (0..hidden_size)
      .map(|i| {
        let back: f64 = output_error
          .iter()
          .zip(&self.params.weights_hidden_output)
          .map(|(e, row)| e * row[i])
          .sum();
        back * relu_derivative(act.hidden_pre[i])
      })
      .collect();

    let p = &mut self.params;
    for (k, row) in p.weights_hidden_output.iter_mut().enumerate() {
      for (w, h) in row.iter_mut().zip(&act.hidden) {
        *w -= lr * output_error[k] * h;
      }
      p.biases_output[k] -= lr * output_error[k];
    }
    for (i, row) in p.weights_input_hidden.iter_mut().enumerate() {
      for (w, x) in row.iter_mut().zip(input) {
        *w -= lr * hidden_error[i] * x;
      }
      p.biases_hidden[i] -= lr * hidden_error[i];
    }

    let loss = mse_loss(&act.probabilities, &target)?;
    let correct = argmax(&act.probabilities) == label.index();
    debug!(?input, %label, loss, correct, "train step");
    Ok(StepReport { loss, correct })
  }
}

fn validate_input(input: &[f64]) -> Result<()> {
  check_len("input", INPUT_SIZE, input.len())?;
  if input.iter().any(|v| !v.is_finite()) {
    return Err(ClassifierError::NonFiniteInput(input.to_vec()));
  }
  Ok(())
}

fn check_finite(layer: &'static str, input: &[f64], values: &[f64]) -> Result<()> {
  if values.iter().all(|v| v.is_finite()) {
    Ok(())
  } else {
    Err(ClassifierError::NumericOverflow {
      layer,
      input: input.to_vec(),
    })
  }
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
  if learning_rate.is_finite() {
    Ok(())
  } else {
    Err(ClassifierError::InvalidConfig(format!(
      "learning rate must be finite, got {learning_rate}"
    )))
  }
}
