use crate::core::score::{AnswerSet, Question, Score, ScoreError, score};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tally {
    pub label: String,
    pub implemented: usize,
    pub total: usize,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub overall: Tally,
    pub by_group: Vec<Tally>,
    pub by_category: Vec<Tally>,
}

/// Group is the category prefix before the first `.`; categories without a
/// dot are their own group.
pub fn group_of(category: &str) -> &str {
    category.split_once('.').map_or(category, |(group, _)| group)
}

pub fn breakdown(questions: &[Question], answers: &AnswerSet) -> Result<Breakdown, ScoreError> {
    let overall = tally("overall", questions, answers, |_| true)?;

    let categories = first_seen(questions.iter().map(|q| q.category.as_str()));
    let by_category = categories
        .iter()
        .map(|category| tally(category, questions, answers, |q| q.category == *category))
        .collect::<Result<Vec<_>, _>>()?;

    let groups = first_seen(questions.iter().map(|q| group_of(&q.category)));
    let by_group = groups
        .iter()
        .map(|group| tally(group, questions, answers, |q| group_of(&q.category) == *group))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Breakdown {
        overall,
        by_group,
        by_category,
    })
}

fn tally<F>(
    label: &str,
    questions: &[Question],
    answers: &AnswerSet,
    include: F,
) -> Result<Tally, ScoreError>
where
    F: Fn(&Question) -> bool,
{
    if answers.len() != questions.len() {
        return Err(ScoreError::IncompleteAnswerSet {
            expected: questions.len(),
            actual: answers.len(),
        });
    }

    let (subset, subset_answers): (Vec<Question>, AnswerSet) = questions
        .iter()
        .zip(answers.iter())
        .filter(|(q, _)| include(q))
        .map(|(q, answer)| (q.clone(), answer))
        .unzip();

    let implemented = subset_answers.iter().filter(|answer| *answer).count();
    Ok(Tally {
        label: label.to_string(),
        implemented,
        total: subset.len(),
        score: score(&subset, &subset_answers)?,
    })
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators() -> Vec<Question> {
        vec![
            Question::new("a", 1.0, "oa.leader").with_id("OA.LS.1"),
            Question::new("b", 1.0, "oa.leader").with_id("OA.LS.2"),
            Question::new("c", 1.0, "oa.teams").with_id("OA.STD.1"),
            Question::new("d", 1.0, "ops").with_id("OPS.1"),
        ]
    }

    #[test]
    fn groups_by_category_prefix() {
        assert_eq!(group_of("oa.leader"), "oa");
        assert_eq!(group_of("a.b.c"), "a");
        assert_eq!(group_of("ops"), "ops");
    }

    #[test]
    fn tallies_overall_groups_and_categories() {
        let answers = AnswerSet::positional(vec![true, false, true, false]);
        let result = breakdown(&indicators(), &answers).unwrap();

        assert_eq!(result.overall.implemented, 2);
        assert_eq!(result.overall.total, 4);
        assert_eq!(result.overall.score.value(), 50.0);

        let labels: Vec<&str> = result.by_category.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["oa.leader", "oa.teams", "ops"]);
        assert_eq!(result.by_category[0].score.value(), 50.0);
        assert_eq!(result.by_category[1].score.value(), 100.0);
        assert_eq!(result.by_category[2].score.value(), 0.0);

        assert_eq!(result.by_group.len(), 2);
        assert_eq!(result.by_group[0].label, "oa");
        assert_eq!(result.by_group[0].implemented, 2);
        assert_eq!(result.by_group[0].total, 3);
    }

    #[test]
    fn rejects_mismatched_answers() {
        let answers = AnswerSet::positional(vec![true]);
        assert!(matches!(
            breakdown(&indicators(), &answers),
            Err(ScoreError::IncompleteAnswerSet { .. })
        ));
    }
}
