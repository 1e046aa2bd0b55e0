use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Artifacts, ModelError};
use crate::models::Verdict;
use crate::text::normalize::{normalize, token_count};

/// Minimum number of whitespace-delimited tokens before the classifier is consulted.
pub const DEFAULT_MIN_TOKENS: usize = 5;

const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("input has {tokens} word(s); at least {required} are needed for a reliable prediction")]
    InsufficientInput { tokens: usize, required: usize },
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
}

impl From<ModelError> for PredictError {
    fn from(err: ModelError) -> Self {
        PredictError::ModelUnavailable(err.to_string())
    }
}

/// Reject passages with fewer than `min_tokens` whitespace-delimited words.
pub fn check_input(text: &str, min_tokens: usize) -> Result<(), PredictError> {
    let tokens = token_count(text);
    if tokens < min_tokens {
        debug!(tokens, required = min_tokens, "input too short to classify");
        return Err(PredictError::InsufficientInput {
            tokens,
            required: min_tokens,
        });
    }
    Ok(())
}

/// Normalize → vectorize → classify, behind the minimum-length guard.
#[derive(Clone)]
pub struct PredictionService {
    artifacts: Artifacts,
    min_tokens: usize,
}

impl PredictionService {
    pub fn new(artifacts: Artifacts, min_tokens: usize) -> Self {
        Self {
            artifacts,
            min_tokens,
        }
    }

    pub fn predict(&self, text: &str) -> Result<Verdict, PredictError> {
        check_input(text, self.min_tokens)?;

        let cleaned = normalize(text);
        let features = self.artifacts.vectorizer.transform(&cleaned)?;
        let label = self.artifacts.classifier.predict(&features)?;
        let proba = self.artifacts.classifier.predict_proba(&features)?;

        let in_range = |p: f64| (-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&p);
        if !in_range(proba.fake) || !in_range(proba.real) {
            warn!(fake = proba.fake, real = proba.real, "classifier probabilities out of range");
            return Err(PredictError::ModelUnavailable(format!(
                "probabilities out of range: fake={}, real={}",
                proba.fake, proba.real
            )));
        }

        let fake_probability = (proba.fake * 100.0).clamp(0.0, 100.0);
        let real_probability = (proba.real * 100.0).clamp(0.0, 100.0);
        debug!(%label, fake_probability, real_probability, "classified input");

        Ok(Verdict {
            label,
            fake_probability,
            real_probability,
        })
    }
}
