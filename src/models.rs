use serde::{Deserialize, Serialize};

/// Credibility tag attached to every article that passed the trusted-source filter.
pub const VERIFIED_SOURCE: &str = "Verified Source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    /// Map a binary class id (`0` = fake, `1` = real) to a label.
    pub fn from_class(class: i64) -> Option<Label> {
        match class {
            0 => Some(Label::Fake),
            1 => Some(Label::Real),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Fake => write!(f, "Fake"),
            Label::Real => write!(f, "Real"),
        }
    }
}

/// Classification result for one passage. Probabilities are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    pub fake_probability: f64,
    pub real_probability: f64,
}

impl Verdict {
    /// Probability of the predicted label, as a percentage.
    pub fn confidence(&self) -> f64 {
        match self.label {
            Label::Fake => self.fake_probability,
            Label::Real => self.real_probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckQuery {
    pub keywords: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub url: String,
    pub credibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaContext {
    pub summary: String,
    pub suggestions: Vec<String>,
}

/// Best-effort corroboration for a passage. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    pub fact_check: Option<FactCheckQuery>,
    pub articles: Option<Vec<Article>>,
    pub encyclopedia: Option<EncyclopediaContext>,
}

/// What the classifier produced for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Verdict(Verdict),
    InsufficientInput { tokens: usize, required: usize },
    ModelUnavailable { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub outcome: Outcome,
    pub evidence: EvidenceBundle,
}

impl AnalysisReport {
    pub fn has_verdict(&self) -> bool {
        matches!(self.outcome, Outcome::Verdict(_))
    }
}

/// Presentation-side state: the passage the user most recently submitted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub current_input: String,
}

impl Session {
    /// Replace the current input, returning the trimmed text to analyze,
    /// or `None` when the submission is blank.
    pub fn submit(&mut self, text: &str) -> Option<&str> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.current_input = trimmed.to_string();
        Some(&self.current_input)
    }
}
