//! Quadrant classifier: a `2 -> hidden -> 4` feed-forward network that learns
//! which quadrant of the plane a point lies in, trained one example at a time
//! with hand-derived backpropagation.
//!
//! ```ignore
//! use quadrant::model::{Classifier, ClassifierConfig, Example, Label};
//!
//! let mut classifier = Classifier::new(&ClassifierConfig::default())?;
//! let data = vec![
//!   Example::new(1.0, 1.0, Label::NE),
//!   Example::new(-1.0, 1.0, Label::NW),
//! ];
//! classifier.train(&data, 100, 0.01)?;
//! let quadrant = classifier.predict(1.0, -2.0)?;
//! ```

pub mod error;
pub mod model;
pub mod subcommands;
pub mod utils;

pub use error::{ClassifierError, Result};
