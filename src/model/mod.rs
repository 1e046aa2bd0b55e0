//! Capability interface over the pre-trained model artifacts.
//!
//! The prediction pipeline only sees [`Vectorizer`] and [`Classifier`]; the
//! concrete implementations load JSON exports of fitted scikit-learn objects:
//!
//! - [`tfidf`]: `TfidfVectorizer` / `CountVectorizer` vocabulary and idf weights.
//! - [`linear`]: binary logistic regression coefficients.

pub mod linear;
pub mod tfidf;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::models::Label;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid artifact: {0}")]
    Invalid(String),
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("classifier produced an unusable result: {0}")]
    BadOutput(String),
}

/// Per-class probabilities, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub fake: f64,
    pub real: f64,
}

pub trait Vectorizer: Send + Sync {
    /// Number of features produced by [`Vectorizer::transform`].
    fn dimension(&self) -> usize;

    fn transform(&self, text: &str) -> Result<Vec<f64>, ModelError>;
}

pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<Label, ModelError>;

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ModelError>;
}

/// Loaded, read-only model pair shared across requests.
#[derive(Clone)]
pub struct Artifacts {
    pub vectorizer: Arc<dyn Vectorizer>,
    pub classifier: Arc<dyn Classifier>,
}

/// Load both artifacts and check that their dimensions agree.
pub fn load_artifacts(vectorizer_path: &Path, classifier_path: &Path) -> Result<Artifacts, ModelError> {
    let vectorizer = tfidf::TfidfVectorizer::from_file(vectorizer_path)?;
    let classifier = linear::LogisticRegression::from_file(classifier_path)?;

    if classifier.dimension() != vectorizer.dimension() {
        return Err(ModelError::DimensionMismatch {
            expected: vectorizer.dimension(),
            actual: classifier.dimension(),
        });
    }

    info!(
        features = vectorizer.dimension(),
        vectorizer = %vectorizer_path.display(),
        classifier = %classifier_path.display(),
        "loaded model artifacts"
    );

    Ok(Artifacts {
        vectorizer: Arc::new(vectorizer),
        classifier: Arc::new(classifier),
    })
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelError::Parse {
        path: path.display().to_string(),
        source,
    })
}
