use std::collections::{BTreeSet, HashMap, HashSet};

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sprs::CsVec;

use super::error::ClassifierError;
use super::stop_words::is_stop_word;
use super::utils::normalized_sparse;

lazy_static! {
    /// Tokens are runs of two or more word characters.
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");
}

/// Settings for the TF-IDF stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Inclusive `(min_n, max_n)` range of word n-grams to extract
    pub ngram_range: (usize, usize),
    /// Remove the English stop list before forming n-grams
    pub english_stop_words: bool,
    /// Lowercase documents before tokenizing
    pub lowercase: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            english_stop_words: true,
            lowercase: true,
        }
    }
}

impl VectorizerConfig {
    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        Ok(())
    }
}

/// A fitted TF-IDF vectorizer with smooth IDF weights and L2-normalised output.
///
/// Feature indices follow the lexicographic order of the vocabulary terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and IDF weights from `documents`.
    ///
    /// # Errors
    /// - `ValidationError` if the n-gram range is invalid
    /// - `FitError` if the corpus is empty or yields no terms
    pub fn fit<S: AsRef<str>>(
        config: VectorizerConfig,
        documents: &[S],
    ) -> Result<Self, ClassifierError> {
        config.validate()?;
        if documents.is_empty() {
            return Err(ClassifierError::FitError("Cannot fit vectorizer on an empty corpus".into()));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = analyze(&config, doc.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ClassifierError::FitError(
                "Empty vocabulary; perhaps the documents only contain stop words".into(),
            ));
        }

        let terms: BTreeSet<&String> = document_frequency.keys().collect();
        let n_docs = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = document_frequency[term] as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term.clone(), index);
        }

        info!(
            "Fitted TF-IDF vocabulary of {} terms over {} documents",
            vocabulary.len(),
            documents.len()
        );

        Ok(Self { config, vocabulary, idf })
    }

    /// Maps one document into the fitted feature space. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> CsVec<f64> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in analyze(&self.config, document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }
        debug!("Document mapped to {} known terms", counts.len());

        let entries = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        normalized_sparse(self.idf.len(), entries)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}

/// Splits a document into the n-gram terms the vectorizer counts.
///
/// Unigrams come first, followed by each longer n-gram in document order.
pub(crate) fn analyze(config: &VectorizerConfig, document: &str) -> Vec<String> {
    let text = if config.lowercase {
        document.to_lowercase()
    } else {
        document.to_string()
    };

    let tokens: Vec<&str> = TOKEN_PATTERN
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|t| !(config.english_stop_words && is_stop_word(t)))
        .collect();

    let (min_n, max_n) = config.ngram_range;
    let mut terms = Vec::new();
    for n in min_n..=max_n.min(tokens.len()) {
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
