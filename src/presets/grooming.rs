use crate::core::score::Question;
use crate::presets::Preset;

pub struct GroomingPreset;

const QUESTIONS: [(&str, &str, f64, &str); 10] = [
    (
        "G.USER",
        "Is the user story written from end-user perspective?",
        1.0,
        "clarity",
    ),
    (
        "G.AC",
        "Are acceptance criteria clearly defined?",
        1.5,
        "requirements",
    ),
    (
        "G.VALUE",
        "Is the business value clearly articulated?",
        1.2,
        "value",
    ),
    (
        "G.SCOPE",
        "Is the scope well-defined and contained?",
        1.3,
        "scope",
    ),
    (
        "G.DEPS",
        "Are all dependencies identified?",
        1.1,
        "technical",
    ),
    (
        "G.APPROACH",
        "Is the technical approach clear?",
        1.2,
        "technical",
    ),
    (
        "G.SPRINT",
        "Can this be completed within one sprint?",
        1.4,
        "size",
    ),
    (
        "G.TESTS",
        "Are there clear test scenarios?",
        1.0,
        "quality",
    ),
    (
        "G.INDEPENDENT",
        "Is this story independent (can be developed in isolation)?",
        1.1,
        "technical",
    ),
    (
        "G.INFO",
        "Is all necessary information available to start development?",
        1.3,
        "readiness",
    ),
];

impl Preset for GroomingPreset {
    fn name(&self) -> &'static str {
        "grooming"
    }

    fn title(&self) -> &'static str {
        "Backlog Grooming Readiness"
    }

    fn questions(&self) -> Vec<Question> {
        QUESTIONS
            .iter()
            .map(|(id, text, weight, category)| {
                Question::new(*text, *weight, *category).with_id(*id)
            })
            .collect()
    }
}
