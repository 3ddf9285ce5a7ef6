use tracing::{debug, instrument};

use super::packet::{PredictRequest, PredictResponse};
use crate::error::{ClassifierError, Result};

/// Asks a running [`super::Server`] to classify one coordinate.
pub struct Client {
  url: String,
  x: f64,
  y: f64,
}

impl Client {
  pub fn new(url: String, x: f64, y: f64) -> Self {
    Self { url, x, y }
  }

  #[instrument(skip(self), fields(url = %self.url))]
  pub async fn run(self) -> Result<PredictResponse> {
    let client = reqwest::Client::new();
    let endpoint = format!("{}/predict", self.url.trim_end_matches('/'));
    let response = client
      .post(endpoint)
      .json(&PredictRequest {
        x: self.x,
        y: self.y,
      })
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(ClassifierError::Server {
        status: status.as_u16(),
        body,
      });
    }
    let answer: PredictResponse = response.json().await?;
    debug!(?answer);
    Ok(answer)
  }
}
