use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("incomplete answer set: expected {expected} answers, got {actual}")]
    IncompleteAnswerSet { expected: usize, actual: usize },

    #[error("degenerate question set: total weight must be finite and above zero")]
    DegenerateQuestionSet,

    #[error("invalid weight {weight} for question '{question}': must be finite and above zero")]
    InvalidWeight { question: String, weight: f64 },

    #[error("duplicate question id '{0}'")]
    DuplicateQuestionId(String),

    #[error("answer refers to unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("question '{0}' answered more than once")]
    DuplicateAnswer(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub weight: f64,
    pub category: String,
}

impl Question {
    pub fn new(text: impl Into<String>, weight: f64, category: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            weight,
            category: category.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Id when present, text otherwise.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.text)
    }
}

/// One boolean per question, in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: Vec<bool>,
}

impl AnswerSet {
    pub fn positional(answers: Vec<bool>) -> Self {
        Self { answers }
    }

    /// Resolves answers addressed by question id or, failing that, by exact
    /// question text. Every question must be answered exactly once.
    pub fn keyed<'a, I>(questions: &[Question], answers: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut slots: Vec<Option<bool>> = vec![None; questions.len()];

        for (key, answer) in answers {
            let index = questions
                .iter()
                .position(|q| q.id.as_deref() == Some(key))
                .or_else(|| questions.iter().position(|q| q.text == key))
                .ok_or_else(|| ScoreError::UnknownQuestion(key.to_string()))?;

            let Some(slot) = slots.get_mut(index) else {
                return Err(ScoreError::UnknownQuestion(key.to_string()));
            };
            if slot.is_some() {
                return Err(ScoreError::DuplicateAnswer(key.to_string()));
            }
            *slot = Some(answer);
        }

        let answered = slots.iter().filter(|slot| slot.is_some()).count();
        if answered != questions.len() {
            return Err(ScoreError::IncompleteAnswerSet {
                expected: questions.len(),
                actual: answered,
            });
        }

        Ok(Self {
            answers: slots.into_iter().flatten().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.answers.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.answers.iter().copied()
    }
}

impl FromIterator<bool> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

impl Extend<bool> for AnswerSet {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        self.answers.extend(iter);
    }
}

/// Weighted percentage in `[0, 100]`. Unrounded; `Display` shows one decimal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn level(self) -> ReadinessLevel {
        classify(self)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "Significant Refinement Required")]
    SignificantRefinementRequired,
    #[serde(rename = "Needs Discussion")]
    NeedsDiscussion,
    #[serde(rename = "Minor Refinement Needed")]
    MinorRefinementNeeded,
    #[serde(rename = "Ready")]
    Ready,
}

impl ReadinessLevel {
    /// Highest band first.
    pub const ALL: [Self; 4] = [
        Self::Ready,
        Self::MinorRefinementNeeded,
        Self::NeedsDiscussion,
        Self::SignificantRefinementRequired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::MinorRefinementNeeded => "Minor Refinement Needed",
            Self::NeedsDiscussion => "Needs Discussion",
            Self::SignificantRefinementRequired => "Significant Refinement Required",
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn total_weight(questions: &[Question]) -> f64 {
    questions.iter().map(|q| q.weight).sum()
}

pub fn score(questions: &[Question], answers: &AnswerSet) -> Result<Score, ScoreError> {
    if answers.len() != questions.len() {
        return Err(ScoreError::IncompleteAnswerSet {
            expected: questions.len(),
            actual: answers.len(),
        });
    }

    let total = total_weight(questions);
    if !total.is_finite() || total <= 0.0 {
        return Err(ScoreError::DegenerateQuestionSet);
    }

    let earned: f64 = questions
        .iter()
        .zip(answers.iter())
        .filter(|(_, answer)| *answer)
        .map(|(q, _)| q.weight)
        .sum();

    Ok(Score(earned / total * 100.0))
}

pub fn classify(score: Score) -> ReadinessLevel {
    let value = score.value();
    if value >= 90.0 {
        ReadinessLevel::Ready
    } else if value >= 75.0 {
        ReadinessLevel::MinorRefinementNeeded
    } else if value >= 50.0 {
        ReadinessLevel::NeedsDiscussion
    } else {
        ReadinessLevel::SignificantRefinementRequired
    }
}
