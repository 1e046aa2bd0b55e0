use std::path::Path;

use serde::Deserialize;

use super::{read_json, ClassProbabilities, Classifier, ModelError};
use crate::models::Label;

#[derive(Debug, Deserialize)]
struct LinearArtifact {
    classes: Vec<i64>,
    coef: Vec<f64>,
    intercept: f64,
}

/// Binary logistic regression: `P(classes[1]) = sigmoid(coef · x + intercept)`.
#[derive(Debug)]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
    /// Label for the negative (`0`) and positive (`1`) side of the decision function.
    negative: Label,
    positive: Label,
}

impl LogisticRegression {
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let artifact: LinearArtifact = read_json(path)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(a: LinearArtifact) -> Result<Self, ModelError> {
        let labels: Option<Vec<Label>> = a.classes.iter().map(|&c| Label::from_class(c)).collect();
        let (negative, positive) = match labels.as_deref() {
            Some([neg, pos]) if neg != pos => (*neg, *pos),
            _ => {
                return Err(ModelError::Invalid(format!(
                    "expected classes [0, 1], got {:?}",
                    a.classes
                )))
            }
        };

        if !a.intercept.is_finite() || a.coef.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid("non-finite coefficient".to_string()));
        }

        Ok(Self {
            coef: a.coef,
            intercept: a.intercept,
            negative,
            positive,
        })
    }

    pub fn dimension(&self) -> usize {
        self.coef.len()
    }

    fn decision(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coef.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coef.len(),
                actual: features.len(),
            });
        }
        let score = self
            .coef
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        if !score.is_finite() {
            return Err(ModelError::BadOutput(format!("decision value {}", score)));
        }
        Ok(score)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &[f64]) -> Result<Label, ModelError> {
        let score = self.decision(features)?;
        Ok(if score > 0.0 { self.positive } else { self.negative })
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ModelError> {
        let p_positive = sigmoid(self.decision(features)?);
        let p_negative = 1.0 - p_positive;

        Ok(match self.positive {
            Label::Real => ClassProbabilities {
                fake: p_negative,
                real: p_positive,
            },
            Label::Fake => ClassProbabilities {
                fake: p_positive,
                real: p_negative,
            },
        })
    }
}
