use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::builder::PipelineBuilder;
use super::error::ClassifierError;
use super::svm::LinearSvc;
use super::vectorizer::TfidfVectorizer;
use super::{ClassifierInfo, Predict};

/// A fitted TF-IDF vectorizer chained with a linear SVM.
///
/// The pipeline is read-only after fitting and can be shared across threads
/// behind an `Arc`:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use expense_classifier::{Pipeline, Predict};
/// use std::sync::Arc;
/// use std::thread;
///
/// let pipeline = Arc::new(Pipeline::builder()
///     .add_example("Starbucks coffee", "Food")?
///     .add_example("Uber ride downtown", "Transport")?
///     .build()?);
///
/// let shared = Arc::clone(&pipeline);
/// let handle = thread::spawn(move || shared.predict("coffee"));
/// assert_eq!(handle.join().unwrap()?, "Food");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    vectorizer: TfidfVectorizer,
    svm: LinearSvc,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Pipeline>();
    }
};

impl Predict for Pipeline {
    fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        self.predict_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::PredictionError("Prediction produced no label".into()))
    }
}

impl Pipeline {
    /// Creates a new PipelineBuilder for fluent construction
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub(crate) fn from_parts(
        vectorizer: TfidfVectorizer,
        svm: LinearSvc,
    ) -> Result<Self, ClassifierError> {
        if vectorizer.vocabulary_len() != svm.n_features() {
            return Err(ClassifierError::BuildError(format!(
                "Vectorizer produces {} features but classifier expects {}",
                vectorizer.vocabulary_len(),
                svm.n_features()
            )));
        }
        Ok(Self { vectorizer, svm })
    }

    /// Labels one document per input, in input order.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>, ClassifierError> {
        texts
            .iter()
            .map(|text| {
                let features = self.vectorizer.transform(text.as_ref());
                self.svm.predict(&features).map(str::to_string)
            })
            .collect()
    }

    /// Per-label decision values for one document.
    ///
    /// For a two-label model the single hyperplane score is reported for the
    /// second label and its negation for the first.
    pub fn decision_scores(&self, text: &str) -> Result<HashMap<String, f64>, ClassifierError> {
        let features = self.vectorizer.transform(text);
        let scores = self.svm.decision_function(&features)?;
        let labels = self.svm.labels();

        let scores = if labels.len() == 2 {
            vec![-scores[0], scores[0]]
        } else {
            scores
        };
        Ok(labels.iter().cloned().zip(scores).collect())
    }

    /// Returns information about the fitted pipeline
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            labels: self.svm.labels().to_vec(),
            vocabulary_size: self.vectorizer.vocabulary_len(),
            ngram_range: self.vectorizer.config().ngram_range,
            english_stop_words: self.vectorizer.config().english_stop_words,
            c: self.svm.config().c,
        }
    }

    pub fn labels(&self) -> &[String] {
        self.svm.labels()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::svm::SvmConfig;
    use crate::classifier::vectorizer::VectorizerConfig;

    fn setup_test_pipeline() -> Pipeline {
        Pipeline::builder()
            .add_example("starbucks coffee", "Food")
            .and_then(|b| b.add_example("grocery store bread", "Food"))
            .and_then(|b| b.add_example("uber ride", "Transport"))
            .and_then(|b| b.add_example("metro ticket", "Transport"))
            .and_then(|b| b.add_example("electricity bill", "Utilities"))
            .and_then(|b| b.add_example("water supply", "Utilities"))
            .and_then(|b| b.build())
            .expect("Failed to fit pipeline")
    }

    #[test]
    fn test_pipeline_info() {
        let pipeline = setup_test_pipeline();
        let info = pipeline.info();
        assert_eq!(info.labels, vec!["Food", "Transport", "Utilities"]);
        assert_eq!(info.ngram_range, (1, 2));
        assert!(info.vocabulary_size > 0);
    }

    #[test]
    fn test_predict_batch_keeps_order() {
        let pipeline = setup_test_pipeline();
        let labels = pipeline.predict_batch(&["uber ride", "starbucks coffee"]).unwrap();
        assert_eq!(labels, vec!["Transport", "Food"]);
    }

    #[test]
    fn test_decision_scores_cover_all_labels() {
        let pipeline = setup_test_pipeline();
        let scores = pipeline.decision_scores("water supply").unwrap();
        assert_eq!(scores.len(), 3);
        let best = scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(label, _)| label.clone())
            .unwrap();
        assert_eq!(best, "Utilities");
    }

    #[test]
    fn test_mismatched_parts_rejected() {
        let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &["coffee shop"]).unwrap();
        let other = TfidfVectorizer::fit(VectorizerConfig::default(), &["uber", "taxi"]).unwrap();
        let samples = vec![other.transform("uber"), other.transform("taxi")];
        let targets = vec!["a".to_string(), "b".to_string()];
        let svm = LinearSvc::fit(SvmConfig::default(), &samples, &targets).unwrap();
        let result = Pipeline::from_parts(vectorizer, svm);
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }
}
