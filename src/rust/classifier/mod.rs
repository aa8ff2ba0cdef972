mod error;
mod stop_words;
mod utils;
pub mod builder;
pub mod pipeline;
pub mod svm;
pub mod vectorizer;

pub use builder::{ClassDefinition, PipelineBuilder};
pub use error::ClassifierError;
pub use pipeline::Pipeline;
pub use svm::{LinearSvc, SvmConfig};
pub use vectorizer::{TfidfVectorizer, VectorizerConfig};

/// Single-example classification, the only capability the service depends on.
pub trait Predict: Send + Sync {
    /// Returns the category label for one description.
    fn predict(&self, text: &str) -> Result<String, ClassifierError>;
}

/// Information about a fitted pipeline
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Labels the classifier can predict, sorted
    pub labels: Vec<String>,
    /// Number of TF-IDF features
    pub vocabulary_size: usize,
    /// Word n-gram range used by the vectorizer
    pub ngram_range: (usize, usize),
    /// Whether English stop words were removed
    pub english_stop_words: bool,
    /// Regularization strength of the linear SVM
    pub c: f64,
}
