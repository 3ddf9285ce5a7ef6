mod app_config;

use quadrant::*;

use app_config::{AppConfig, InitKind};
use clap::{Parser, Subcommand};
use std::{error::Error, path::PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
  /// YAML file with training and serving defaults
  #[arg(short, long, value_name = "PATH", global = true)]
  config: Option<PathBuf>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Train a classifier on a labelled dataset and save it
  Train {
    /// Dataset file, one `<x> <y> <LABEL>` per line
    #[arg(short, long, value_name = "PATH")]
    data: PathBuf,
    /// Where to write the trained model (JSON)
    #[arg(short, long, value_name = "PATH")]
    model: PathBuf,
    #[arg(short, long, value_name = "INT")]
    epochs: Option<usize>,
    #[arg(short, long, value_name = "FLOAT")]
    learning_rate: Option<f64>,
    #[arg(long, value_name = "INT")]
    hidden_size: Option<usize>,
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    init: Option<InitKind>,
    /// Train on this fraction of the data and report accuracy on the rest
    #[arg(long, value_name = "RATIO")]
    split: Option<f64>,
  },
  /// Classify one coordinate with a saved model
  Predict {
    #[arg(short, long, value_name = "PATH")]
    model: PathBuf,
    #[arg(short, allow_hyphen_values = true)]
    x: f64,
    #[arg(short, allow_hyphen_values = true)]
    y: f64,
  },
  /// Write a synthetic dataset of correctly labelled points
  Generate {
    #[arg(short, long, value_name = "PATH")]
    out: PathBuf,
    #[arg(short = 'n', long, default_value_t = 200)]
    count: usize,
    /// Points are drawn from [-range, range) on both axes
    #[arg(short, long, default_value_t = 10.0)]
    range: f64,
    #[arg(short, long, default_value_t = 1)]
    seed: u64,
  },
  /// Serve predictions over HTTP
  Serve {
    #[arg(short, long, value_name = "PATH")]
    model: PathBuf,
    #[arg(short, long)]
    port: Option<u16>,
  },
  /// Ask a running server to classify one coordinate
  Client {
    /// Host of the prediction server
    #[arg(long, default_value = "127.0.0.1")]
    url: String,
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(short, allow_hyphen_values = true)]
    x: f64,
    #[arg(short, allow_hyphen_values = true)]
    y: f64,
  },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  utils::init_logging()?;
  let args = Cli::parse();
  let file_config = match &args.config {
    Some(path) => AppConfig::from_file(path)?,
    None => AppConfig::default(),
  };

  match args.command {
    Command::Train {
      data,
      model,
      epochs,
      learning_rate,
      hidden_size,
      seed,
      init,
      split,
    } => {
      let config = file_config.merge(AppConfig {
        hidden_size,
        epochs,
        learning_rate,
        seed,
        init,
        ..AppConfig::default()
      });
      let summary = subcommands::Train::new(
        &data,
        &model,
        config.classifier_config(),
        config.train_params(),
        split,
      )
      .run()?;
      println!("train accuracy: {:.3}", summary.train_accuracy);
      if let Some(test_accuracy) = summary.test_accuracy {
        println!("test accuracy: {:.3}", test_accuracy);
      }
    }
    Command::Predict { model, x, y } => {
      let label = subcommands::Predict::new(&model, x, y).run()?;
      println!("{}", label);
    }
    Command::Generate {
      out,
      count,
      range,
      seed,
    } => {
      let written = subcommands::Generate::new(&out, count, range, seed).run()?;
      info!("generated {written} examples");
    }
    Command::Serve { model, port } => {
      let port = port.unwrap_or_else(|| file_config.port());
      let app = subcommands::Server::new(&model, port)?;
      app.run().await?;
    }
    Command::Client { url, port, x, y } => {
      let port = port.unwrap_or_else(|| file_config.port());
      let true_url = format!("http://{}:{}", url, port);
      let app = subcommands::Client::new(true_url, x, y);
      let response = app.run().await?;
      println!("{}", serde_json::to_string(&response)?);
    }
  }
  Ok(())
}
