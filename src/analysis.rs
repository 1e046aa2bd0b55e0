use tracing::info;

use crate::evidence::EvidenceAggregator;
use crate::models::{AnalysisReport, Outcome};
use crate::predict::{check_input, PredictError, PredictionService};

/// Pairs the classifier with the evidence lookups for one passage at a time.
///
/// The predictor is a `Result` so the evidence side keeps working when the
/// model artifacts failed to load.
pub struct Analyzer {
    predictor: Result<PredictionService, String>,
    min_tokens: usize,
    evidence: EvidenceAggregator,
}

impl Analyzer {
    pub fn new(
        predictor: Result<PredictionService, String>,
        min_tokens: usize,
        evidence: EvidenceAggregator,
    ) -> Self {
        Self {
            predictor,
            min_tokens,
            evidence,
        }
    }

    pub fn classify(&self, text: &str) -> Outcome {
        let result = match &self.predictor {
            Ok(service) => service.predict(text),
            Err(reason) => check_input(text, self.min_tokens)
                .and(Err(PredictError::ModelUnavailable(reason.clone()))),
        };

        match result {
            Ok(verdict) => Outcome::Verdict(verdict),
            Err(PredictError::InsufficientInput { tokens, required }) => {
                Outcome::InsufficientInput { tokens, required }
            }
            Err(PredictError::ModelUnavailable(reason)) => Outcome::ModelUnavailable { reason },
        }
    }

    /// Classify `text` and gather evidence for it. Evidence never changes the outcome.
    pub async fn analyze(&self, text: &str) -> AnalysisReport {
        let outcome = self.classify(text);
        let evidence = self.evidence.gather(text).await;

        info!(
            verdict = matches!(outcome, Outcome::Verdict(_)),
            fact_check = evidence.fact_check.is_some(),
            articles = evidence.articles.as_ref().map_or(0, Vec::len),
            encyclopedia = evidence.encyclopedia.is_some(),
            "analysis finished"
        );

        AnalysisReport { outcome, evidence }
    }
}
