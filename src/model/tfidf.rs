use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::{read_json, ModelError, Vectorizer};

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// On-disk export of a fitted bag-of-words vectorizer.
///
/// Without `idf` the artifact behaves like a `CountVectorizer`.
#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default)]
    binary: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Norm {
    L1,
    L2,
}

#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    binary: bool,
    norm: Option<Norm>,
    token_re: Regex,
}

impl TfidfVectorizer {
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let artifact: VectorizerArtifact = read_json(path)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(a: VectorizerArtifact) -> Result<Self, ModelError> {
        let dim = a.vocabulary.len();

        if let Some((term, idx)) = a.vocabulary.iter().find(|&(_, &idx)| idx >= dim) {
            return Err(ModelError::Invalid(format!(
                "vocabulary index {} for {:?} is out of range (size {})",
                idx, term, dim
            )));
        }
        if let Some(idf) = &a.idf {
            if idf.len() != dim {
                return Err(ModelError::Invalid(format!(
                    "idf has {} weights but vocabulary has {} terms",
                    idf.len(),
                    dim
                )));
            }
        }
        let (min_n, max_n) = a.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Invalid(format!(
                "bad ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_re = Regex::new(&a.token_pattern)
            .map_err(|e| ModelError::Invalid(format!("bad token_pattern: {}", e)))?;

        Ok(Self {
            vocabulary: a.vocabulary,
            idf: a.idf,
            ngram_range: a.ngram_range,
            sublinear_tf: a.sublinear_tf,
            binary: a.binary,
            norm: a.norm,
            token_re,
        })
    }

    /// Tokens and n-grams in the same shape the vocabulary was fitted on.
    fn terms(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = self.token_re.find_iter(text).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> Result<Vec<f64>, ModelError> {
        let mut features = vec![0.0f64; self.dimension()];

        for term in self.terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                features[idx] += 1.0;
            }
        }

        for value in features.iter_mut().filter(|v| **v > 0.0) {
            if self.binary {
                *value = 1.0;
            } else if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
        }

        if let Some(idf) = &self.idf {
            for (value, weight) in features.iter_mut().zip(idf) {
                *value *= weight;
            }
        }

        let norm = match self.norm {
            Some(Norm::L2) => features.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => features.iter().map(|v| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            features.iter_mut().for_each(|v| *v /= norm);
        }

        if features.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::BadOutput("non-finite feature value".to_string()));
        }

        Ok(features)
    }
}
