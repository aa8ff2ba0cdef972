//! One-shot training job: CSV in, pipeline artifact out.

use std::path::PathBuf;
use std::time::Instant;

use log::{error, info};

use crate::artifact::{ArtifactError, ArtifactStore, DEFAULT_MODEL_PATH};
use crate::classifier::{ClassifierError, Pipeline, SvmConfig, VectorizerConfig};
use crate::dataset::{DatasetError, TrainingSet, DEFAULT_DATA_PATH};

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub vectorizer: VectorizerConfig,
    pub svm: SvmConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_path: PathBuf::from(DEFAULT_MODEL_PATH),
            vectorizer: VectorizerConfig::default(),
            svm: SvmConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainOutcome {
    /// The pipeline was fitted and written to `path`.
    Saved {
        path: PathBuf,
        examples: usize,
        labels: Vec<String>,
    },
    /// The dataset file does not exist; nothing was written.
    DatasetMissing { path: PathBuf },
}

/// Fits the pipeline on the configured dataset and writes the artifact.
///
/// A missing dataset is reported and returned as `DatasetMissing` rather than
/// an error. Every other failure aborts the run before the artifact is touched.
pub fn train_and_save(config: &TrainerConfig) -> Result<TrainOutcome, TrainError> {
    info!("--- Training and saving the expense classifier ---");
    let start = Instant::now();

    let training_set = match TrainingSet::from_path(&config.data_path) {
        Ok(set) => set,
        Err(DatasetError::NotFound(path)) => {
            error!(
                "Dataset {:?} not found. Make sure the training CSV exists before training.",
                path
            );
            return Ok(TrainOutcome::DatasetMissing { path });
        }
        Err(e) => return Err(e.into()),
    };

    info!("Training the model with {} data points", training_set.len());
    let pipeline = fit(config, &training_set)?;
    info!("Model training complete (took {:.2?})", start.elapsed());

    let store = ArtifactStore::new(&config.output_path);
    store.save(&pipeline)?;
    info!("Final model saved to {:?}", store.path());

    Ok(TrainOutcome::Saved {
        path: config.output_path.clone(),
        examples: training_set.len(),
        labels: pipeline.labels().to_vec(),
    })
}

/// Fits a pipeline on an already loaded training set.
pub fn fit(config: &TrainerConfig, training_set: &TrainingSet) -> Result<Pipeline, ClassifierError> {
    let mut builder = Pipeline::builder()
        .with_vectorizer_config(config.vectorizer.clone())
        .with_svm_config(config.svm.clone());
    for example in &training_set.examples {
        builder = builder.add_example(example.description.as_str(), example.category.as_str())?;
    }
    builder.build()
}
