//! Expense description classifier: a TF-IDF + linear SVM pipeline, a one-shot
//! trainer that fits it from a CSV, and an HTTP service that serves it.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use expense_classifier::{ClassDefinition, Pipeline, Predict};
//!
//! let pipeline = Pipeline::builder()
//!     .add_class(
//!         ClassDefinition::new("Food")
//!             .with_examples(vec!["starbucks coffee", "grocery store", "pizza dinner"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("Transport")
//!             .with_examples(vec!["uber ride", "metro card", "gas station fuel"])
//!     )?
//!     .build()?;
//!
//! let label = pipeline.predict("coffee at starbucks")?;
//! assert_eq!(label, "Food");
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! A fitted pipeline is written and read through [`ArtifactStore`]; the
//! service only ever sees it through the [`Predict`] trait.

pub mod artifact;
pub mod classifier;
pub mod dataset;
mod runtime;
pub mod service;
pub mod trainer;

pub use artifact::{ArtifactError, ArtifactStore};
pub use classifier::{
    ClassDefinition, ClassifierError, ClassifierInfo, LinearSvc, Pipeline, PipelineBuilder,
    Predict, SvmConfig, TfidfVectorizer, VectorizerConfig,
};
pub use dataset::{DatasetError, TrainingExample, TrainingSet};
pub use runtime::{create_runtime, RuntimeConfig};
pub use trainer::{train_and_save, TrainError, TrainOutcome, TrainerConfig};

/// Initializes `env_logger` from `RUST_LOG`, defaulting to `info`.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
