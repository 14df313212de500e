use crate::core::score::{self, AnswerSet, Question, ReadinessLevel, Score, ScoreError};
use serde::Serialize;
use std::collections::HashSet;

/// A named, validated question set. Weights are finite and positive and ids
/// are unique, so scoring a complete answer set cannot fail.
#[derive(Debug, Clone, Serialize)]
pub struct Questionnaire {
    name: String,
    title: String,
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, ScoreError> {
        if questions.is_empty() {
            return Err(ScoreError::DegenerateQuestionSet);
        }

        let mut ids = HashSet::new();
        for question in &questions {
            if !question.weight.is_finite() || question.weight <= 0.0 {
                return Err(ScoreError::InvalidWeight {
                    question: question.key().to_string(),
                    weight: question.weight,
                });
            }
            if let Some(id) = &question.id {
                if !ids.insert(id.as_str()) {
                    return Err(ScoreError::DuplicateQuestionId(id.clone()));
                }
            }
        }

        if !score::total_weight(&questions).is_finite() {
            return Err(ScoreError::DegenerateQuestionSet);
        }

        Ok(Self {
            name: name.into(),
            title: title.into(),
            questions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn total_weight(&self) -> f64 {
        score::total_weight(&self.questions)
    }

    pub fn score(&self, answers: &AnswerSet) -> Result<Score, ScoreError> {
        score::score(&self.questions, answers)
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> Result<(Score, ReadinessLevel), ScoreError> {
        let score = self.score(answers)?;
        Ok((score, score.level()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite_weights() {
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Questionnaire::new("t", "T", vec![Question::new("A", weight, "x")])
                .unwrap_err();
            assert!(matches!(err, ScoreError::InvalidWeight { .. }), "{weight}");
        }
    }

    #[test]
    fn rejects_empty_and_duplicate_ids() {
        assert_eq!(
            Questionnaire::new("t", "T", Vec::new()).unwrap_err(),
            ScoreError::DegenerateQuestionSet
        );

        let err = Questionnaire::new(
            "t",
            "T",
            vec![
                Question::new("A", 1.0, "x").with_id("Q.1"),
                Question::new("B", 1.0, "x").with_id("Q.1"),
            ],
        )
        .unwrap_err();
        assert_eq!(err, ScoreError::DuplicateQuestionId("Q.1".to_string()));
    }

    #[test]
    fn rejects_weights_whose_total_overflows() {
        let err = Questionnaire::new(
            "t",
            "T",
            vec![Question::new("A", 1e308, "x"), Question::new("B", 1e308, "x")],
        )
        .unwrap_err();
        assert_eq!(err, ScoreError::DegenerateQuestionSet);
    }

    #[test]
    fn evaluate_returns_score_and_level() {
        let questionnaire = Questionnaire::new(
            "t",
            "T",
            vec![
                Question::new("A", 1.0, "x"),
                Question::new("B", 1.0, "x"),
                Question::new("C", 2.0, "x"),
            ],
        )
        .unwrap();
        let (score, level) = questionnaire
            .evaluate(&AnswerSet::positional(vec![true, false, true]))
            .unwrap();
        assert_eq!(score.value(), 75.0);
        assert_eq!(level, ReadinessLevel::MinorRefinementNeeded);
        assert_eq!(questionnaire.total_weight(), 4.0);
    }
}
