use log::info;

use super::error::ClassifierError;
use super::pipeline::Pipeline;
use super::svm::{LinearSvc, SvmConfig};
use super::vectorizer::{TfidfVectorizer, VectorizerConfig};

/// A category label together with example descriptions that belong to it.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The category label predicted for matching descriptions
    pub label: String,
    /// Example descriptions labeled with this category
    pub examples: Vec<String>,
}

impl ClassDefinition {
    /// Creates a new class definition without examples
    ///
    /// # Example
    /// ```
    /// use expense_classifier::ClassDefinition;
    ///
    /// let class = ClassDefinition::new("Food")
    ///     .with_examples(vec!["starbucks coffee", "grocery store"]);
    /// assert_eq!(class.examples.len(), 2);
    /// ```
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            examples: Vec::new(),
        }
    }

    /// Adds examples to the class definition
    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }
}

/// A builder for fitting a Pipeline with a fluent interface.
///
/// Examples are kept in insertion order; fitting is deterministic for a given
/// order and configuration.
#[derive(Default, Debug)]
pub struct PipelineBuilder {
    documents: Vec<String>,
    labels: Vec<String>,
    vectorizer_config: VectorizerConfig,
    svm_config: SvmConfig,
}

impl PipelineBuilder {
    /// Creates a new empty PipelineBuilder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TF-IDF configuration
    pub fn with_vectorizer_config(mut self, config: VectorizerConfig) -> Self {
        self.vectorizer_config = config;
        self
    }

    /// Sets the linear SVM configuration
    pub fn with_svm_config(mut self, config: SvmConfig) -> Self {
        self.svm_config = config;
        self
    }

    /// Validates a single labeled example:
    /// - Label must not be empty
    /// - Text must not be empty after trimming
    fn validate_example(text: &str, label: &str) -> Result<(), ClassifierError> {
        if label.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Class label cannot be empty".into()));
        }
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Example for class '{}' cannot be empty",
                label
            )));
        }
        Ok(())
    }

    /// Adds one labeled training example
    ///
    /// # Errors
    /// * `ValidationError` if the label or the text is blank
    pub fn add_example(
        mut self,
        text: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        let text = text.into();
        let label = label.into();
        Self::validate_example(&text, &label)?;
        self.documents.push(text);
        self.labels.push(label);
        Ok(self)
    }

    /// Adds every example of a class definition
    ///
    /// # Errors
    /// * `ValidationError` if the class has no examples, or any example is blank
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        if class.examples.is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' must have at least one example",
                class.label
            )));
        }
        for example in class.examples {
            self = self.add_example(example, class.label.clone())?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Fits the vectorizer, then the classifier on the vectorized examples
    ///
    /// # Errors
    /// * `BuildError` if no examples were added
    /// * `FitError` / `ValidationError` forwarded from the two stages
    pub fn build(self) -> Result<Pipeline, ClassifierError> {
        if self.documents.is_empty() {
            return Err(ClassifierError::BuildError("At least one example must be added".into()));
        }

        info!("Fitting pipeline on {} examples", self.documents.len());
        let vectorizer = TfidfVectorizer::fit(self.vectorizer_config, &self.documents)?;
        let samples: Vec<_> = self
            .documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect();
        let svm = LinearSvc::fit(self.svm_config, &samples, &self.labels)?;

        Pipeline::from_parts(vectorizer, svm)
    }
}
