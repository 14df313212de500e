pub mod questionnaire;
pub mod report;
pub mod review;
pub mod score;
pub mod stats;

use crate::config::Config;
use crate::core::questionnaire::Questionnaire;
use crate::core::report::{Evaluation, FailedItem, FinalReport};
use crate::core::score::{AnswerSet, Question, ScoreError};
use crate::utils::fs as fs_utils;
use anyhow::{Result, bail};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerInput {
    Positional(Vec<bool>),
    Keyed(KeyedAnswers),
}

/// Answers keyed by question id or text, in file order. Repeated keys are
/// kept so they can be rejected instead of overwriting each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedAnswers(Vec<(String, bool)>);

impl<'de> Deserialize<'de> for KeyedAnswers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyedVisitor;

        impl<'de> Visitor<'de> for KeyedVisitor {
            type Value = KeyedAnswers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question id or text to true/false")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, answer)) = map.next_entry::<String, bool>()? {
                    pairs.push((key, answer));
                }
                Ok(KeyedAnswers(pairs))
            }
        }

        deserializer.deserialize_map(KeyedVisitor)
    }
}

impl AnswerInput {
    pub fn resolve(&self, questions: &[Question]) -> Result<AnswerSet, ScoreError> {
        match self {
            Self::Positional(answers) => {
                if answers.len() != questions.len() {
                    return Err(ScoreError::IncompleteAnswerSet {
                        expected: questions.len(),
                        actual: answers.len(),
                    });
                }
                Ok(AnswerSet::positional(answers.clone()))
            }
            Self::Keyed(answers) => AnswerSet::keyed(
                questions,
                answers.0.iter().map(|(key, answer)| (key.as_str(), *answer)),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerFile {
    Envelope {
        #[serde(default)]
        item: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        questionnaire: Option<String>,
        answers: AnswerInput,
    },
    Bare(AnswerInput),
}

pub fn run_batch(path: &Path, questionnaire: &Questionnaire, cfg: &Config) -> Result<FinalReport> {
    let files = fs_utils::collect_answer_files(path)?;
    if files.is_empty() {
        bail!("no answer files (*.json) found under {}", path.display());
    }

    let base = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };

    let mut evaluations = Vec::new();
    let mut failures = Vec::new();
    let mut scored_from: HashMap<String, String> = HashMap::new();

    for file in files {
        let source = fs_utils::relative_path(base, &file);
        match score_file(&file, questionnaire) {
            Ok(evaluation) => {
                if let Some(first) = scored_from.get(&evaluation.item) {
                    warn!(item = %evaluation.item, %source, "duplicate answers for item");
                    failures.push(FailedItem {
                        error: format!(
                            "duplicate answers for item {} (already scored from {})",
                            evaluation.item, first
                        ),
                        source,
                    });
                    continue;
                }
                debug!(item = %evaluation.item, score = %evaluation.score, "scored");
                scored_from.insert(evaluation.item.clone(), source);
                evaluations.push(evaluation);
            }
            Err(err) => {
                warn!(%source, "failed to score answer file: {err:#}");
                failures.push(FailedItem {
                    source,
                    error: format!("{err:#}"),
                });
            }
        }
    }

    sort_evaluations(&mut evaluations);
    failures.sort_by(|a, b| a.source.cmp(&b.source));

    Ok(FinalReport::new(questionnaire, evaluations, failures, cfg))
}

fn score_file(path: &Path, questionnaire: &Questionnaire) -> Result<Evaluation> {
    let file: AnswerFile = fs_utils::read_json(path)?;
    let fallback_item = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let (item, title, input) = match file {
        AnswerFile::Envelope {
            item,
            title,
            questionnaire: target,
            answers,
        } => {
            if let Some(target) = target {
                if !target.eq_ignore_ascii_case(questionnaire.name()) {
                    bail!(
                        "answers target questionnaire '{}' but scoring with '{}'",
                        target,
                        questionnaire.name()
                    );
                }
            }
            (item.unwrap_or(fallback_item), title, answers)
        }
        AnswerFile::Bare(answers) => (fallback_item, None, answers),
    };

    let answers = input.resolve(questionnaire.questions())?;
    let evaluation = Evaluation::new(item, questionnaire, &answers)?;
    Ok(match title {
        Some(title) => evaluation.with_title(title),
        None => evaluation,
    })
}

fn sort_evaluations(evaluations: &mut [Evaluation]) {
    evaluations.sort_by(|a, b| {
        a.score
            .value()
            .total_cmp(&b.score.value())
            .then(a.item.cmp(&b.item))
    });
}
