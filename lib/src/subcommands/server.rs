use std::{path::Path, sync::Arc};

use axum::{
  extract::State,
  http::StatusCode,
  routing::{get, post},
  Json, Router,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::packet::{PredictRequest, PredictResponse};
use crate::{error::Result, model::Classifier, utils::load_model};

/// HTTP prediction service. The model is shared read-only between requests.
pub struct Server {
  port: u16,
  classifier: Arc<Classifier>,
}

impl Server {
  pub fn new(model_path: &Path, port: u16) -> Result<Self> {
    Ok(Self::with_classifier(load_model(model_path)?, port))
  }

  pub fn with_classifier(classifier: Classifier, port: u16) -> Self {
    Self {
      port,
      classifier: Arc::new(classifier),
    }
  }

  pub fn router(&self) -> Router {
    Router::new()
      .route("/health", get(Self::handle_health))
      .route("/predict", post(Self::handle_predict))
      .with_state(self.classifier.clone())
  }

  pub async fn run(self) -> Result<()> {
    let server_addr = format!("0.0.0.0:{}", self.port);
    let tcp_listener = TcpListener::bind(server_addr).await?;
    self.serve(tcp_listener).await
  }

  pub async fn serve(self, tcp_listener: TcpListener) -> Result<()> {
    info!("listening on {}", tcp_listener.local_addr()?);
    axum::serve(tcp_listener, self.router()).await?;
    Ok(())
  }

  async fn handle_health() -> &'static str {
    "ok"
  }

  async fn handle_predict(
    State(classifier): State<Arc<Classifier>>,
    Json(request): Json<PredictRequest>,
  ) -> std::result::Result<Json<PredictResponse>, (StatusCode, String)> {
    match classifier.classify(request.x, request.y) {
      Ok((label, probabilities)) => Ok(Json(PredictResponse {
        label,
        probabilities,
      })),
      Err(err) => {
        warn!(%err, "rejected prediction request");
        Err((StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    model::{fixtures::axis_aligned, Label},
    subcommands::Client,
  };

  async fn spawn_server(classifier: Classifier) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::with_classifier(classifier, addr.port());
    tokio::spawn(server.serve(listener));
    format!("http://{addr}")
  }

  #[tokio::test]
  async fn answers_predictions_and_health() {
    let url = spawn_server(Classifier::from_parameters(axis_aligned()).unwrap()).await;

    let health = reqwest::get(format!("{url}/health")).await.unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");

    let response = Client::new(url.clone(), 3.0, 2.0).run().await.unwrap();
    assert_eq!(response.label, Label::NE);
    assert_eq!(response.probabilities.len(), 4);
    assert!((response.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);

    let response = Client::new(format!("{url}/"), -1.0, -4.0).run().await.unwrap();
    assert_eq!(response.label, Label::SW);
  }

  #[tokio::test]
  async fn malformed_request_is_rejected() {
    let url = spawn_server(Classifier::zeroed(5).unwrap()).await;
    let response = reqwest::Client::new()
      .post(format!("{url}/predict"))
      .json(&serde_json::json!({ "x": 1.0 }))
      .send()
      .await
      .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
  }
}
