use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use expense_classifier::service::{self, ServerConfig};
use expense_classifier::{
    create_runtime, train_and_save, ArtifactStore, Predict, RuntimeConfig, TrainOutcome,
    TrainerConfig,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the pipeline on a labeled CSV and write the model artifact
    Train {
        /// CSV with subcategory, note and category columns
        #[arg(long, env = "EXPENSE_DATA_PATH", default_value = expense_classifier::dataset::DEFAULT_DATA_PATH)]
        data: PathBuf,
        /// Where to write the model artifact
        #[arg(long, env = "EXPENSE_MODEL_PATH", default_value = expense_classifier::artifact::DEFAULT_MODEL_PATH)]
        output: PathBuf,
    },
    /// Serve POST /predict with the trained model
    Serve {
        /// Model artifact to load at startup
        #[arg(long, env = "EXPENSE_MODEL_PATH", default_value = expense_classifier::artifact::DEFAULT_MODEL_PATH)]
        model: PathBuf,
        /// Port to listen on (all interfaces)
        #[arg(long, env = "PORT", default_value_t = service::config::DEFAULT_PORT)]
        port: u16,
        /// Runtime worker threads, 0 for one per core
        #[arg(long, env = "EXPENSE_WORKERS", default_value_t = 0)]
        workers: usize,
    },
    /// Classify a single description with the trained model
    Predict {
        /// Transaction description to classify
        text: String,
        /// Model artifact to load
        #[arg(long, env = "EXPENSE_MODEL_PATH", default_value = expense_classifier::artifact::DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

fn server_config(model: PathBuf, port: u16, workers: usize) -> ServerConfig {
    ServerConfig {
        model_path: model,
        port,
        runtime: RuntimeConfig { worker_threads: workers },
    }
}

fn main() -> anyhow::Result<()> {
    expense_classifier::init_logger();
    let args = Args::parse();

    match args.command {
        Command::Train { data, output } => {
            let config = TrainerConfig {
                data_path: data,
                output_path: output,
                ..TrainerConfig::default()
            };
            match train_and_save(&config)? {
                TrainOutcome::Saved { path, examples, labels } => info!(
                    "Saved model to {:?} ({} examples, {} categories)",
                    path,
                    examples,
                    labels.len()
                ),
                TrainOutcome::DatasetMissing { path } => {
                    info!("Training skipped, no dataset at {:?}", path)
                }
            }
        }
        Command::Serve { model, port, workers } => {
            let config = server_config(model, port, workers);
            let runtime = create_runtime(&config.runtime).context("failed to build runtime")?;
            runtime.block_on(service::run(config))?;
        }
        Command::Predict { text, model } => {
            let store = ArtifactStore::new(&model);
            let pipeline = store
                .load()
                .with_context(|| format!("failed to load model from {}", model.display()))?;
            let label = pipeline.predict(&text)?;
            let mut scores: Vec<_> = pipeline.decision_scores(&text)?.into_iter().collect();
            scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            println!("Predicted category: {}", label);
            println!("Decision scores (sorted):");
            for (category, score) in scores {
                println!("  {}: {:.4}", category, score);
            }
        }
    }

    Ok(())
}
