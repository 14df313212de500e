use crate::core::questionnaire::Questionnaire;
use crate::core::report::{AssessmentReport, Evaluation};
use crate::core::score::AnswerSet;
use crate::core::stats;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StoryPoints(u8);

impl StoryPoints {
    pub const SCALE: [u8; 7] = [1, 2, 3, 5, 8, 13, 21];

    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not on the story point scale (1, 2, 3, 5, 8, 13, 21)")]
pub struct InvalidStoryPoints(pub u8);

impl TryFrom<u8> for StoryPoints {
    type Error = InvalidStoryPoints;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if Self::SCALE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidStoryPoints(value))
        }
    }
}

impl fmt::Display for StoryPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BacklogItem {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_comment: Option<String>,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{} {} ", question, hint)?;
            self.output.flush()?;

            match self.read_answer()?.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please enter 'y' or 'n'")?,
            }
        }
    }

    pub fn story_points(&mut self) -> Result<StoryPoints> {
        loop {
            write!(
                self.output,
                "Estimate story points (1, 2, 3, 5, 8, 13, 21): "
            )?;
            self.output.flush()?;

            let answer = self.read_answer()?;
            match answer.parse::<u8>().map(StoryPoints::try_from) {
                Ok(Ok(points)) => return Ok(points),
                Ok(Err(err)) => writeln!(self.output, "{}", err)?,
                Err(_) => writeln!(self.output, "Please enter a number")?,
            }
        }
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed reading answer")?;
        if read == 0 {
            bail!("input closed before the review finished");
        }
        Ok(line.trim().to_ascii_lowercase())
    }
}

pub fn progress_bar(answered: usize, total: usize, width: usize) -> String {
    let progress = if total == 0 {
        0.0
    } else {
        answered as f64 / total as f64
    };
    let filled = ((width as f64 * progress) as usize).min(width);
    format!(
        "Progress: [{}{}] {:.1}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        progress * 100.0
    )
}

pub fn review_backlog<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    questionnaire: &Questionnaire,
    items: &[BacklogItem],
    story_points_from: f64,
) -> Result<Vec<Evaluation>> {
    let mut reviewed = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        print_item(&mut prompter.output, item)?;

        let answers = questionnaire
            .questions()
            .iter()
            .map(|question| prompter.confirm(&question.text, false))
            .collect::<Result<AnswerSet>>()?;

        let mut evaluation = Evaluation::new(item.key.clone(), questionnaire, &answers)?
            .with_title(item.title.clone());

        writeln!(prompter.output, "\nScore: {}%", evaluation.score)?;
        writeln!(prompter.output, "Readiness Level: {}\n", evaluation.level)?;

        if evaluation.score.value() >= story_points_from {
            evaluation = evaluation.with_story_points(prompter.story_points()?);
        }
        reviewed.push(evaluation);

        if idx + 1 < items.len() && !prompter.confirm("\nContinue to next item?", true)? {
            info!(
                reviewed = reviewed.len(),
                remaining = items.len() - reviewed.len(),
                "review stopped early"
            );
            break;
        }
    }

    Ok(reviewed)
}

pub fn run_assessment<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    questionnaire: &Questionnaire,
) -> Result<AssessmentReport> {
    let total = questionnaire.len();
    let mut answers = Vec::with_capacity(total);
    let mut current_category: Option<&str> = None;

    for question in questionnaire.questions() {
        if current_category != Some(question.category.as_str()) {
            current_category = Some(question.category.as_str());
            writeln!(prompter.output, "{}", "=".repeat(80))?;
            writeln!(prompter.output, "{}", progress_bar(answers.len(), total, 50))?;
            writeln!(
                prompter.output,
                "Questions answered: {}/{}",
                answers.len(),
                total
            )?;
            writeln!(prompter.output, "{}", "=".repeat(80))?;
            writeln!(
                prompter.output,
                "{:^80}",
                format!("{} - {}", questionnaire.title(), question.category)
            )?;
            writeln!(prompter.output, "{}", "=".repeat(80))?;
        }

        let prompt = match &question.id {
            Some(id) => format!("[{}] {}\nImplemented?", id, question.text),
            None => format!("{}\nImplemented?", question.text),
        };
        answers.push(prompter.confirm(&prompt, false)?);
    }

    let answers = AnswerSet::positional(answers);
    let evaluation = Evaluation::new(questionnaire.name(), questionnaire, &answers)?
        .with_title(questionnaire.title());
    let statistics = stats::breakdown(questionnaire.questions(), &answers)?;

    Ok(AssessmentReport {
        title: questionnaire.title().to_string(),
        generated_at: chrono::Local::now().to_rfc3339(),
        evaluation,
        statistics,
    })
}

fn print_item<W: Write>(output: &mut W, item: &BacklogItem) -> Result<()> {
    writeln!(output, "\nReviewing Item: {} - {}", item.key, item.title)?;
    if let Some(description) = &item.description {
        writeln!(output, "\nDescription:\n{}", description)?;
    }
    writeln!(
        output,
        "\nAssignee: {}",
        item.assignee.as_deref().unwrap_or("Unassigned")
    )?;
    if let Some(status) = &item.status {
        writeln!(output, "Status: {}", status)?;
    }
    if let Some(comment) = &item.last_comment {
        writeln!(output, "Last Comment: {}", comment)?;
    }
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score::{Question, ReadinessLevel};
    use std::io::Cursor;

    fn questionnaire() -> Questionnaire {
        Questionnaire::new(
            "t",
            "Grooming",
            vec![
                Question::new("A?", 1.0, "x"),
                Question::new("B?", 1.0, "x"),
                Question::new("C?", 2.0, "y"),
            ],
        )
        .unwrap()
    }

    fn item(key: &str) -> BacklogItem {
        BacklogItem {
            key: key.to_string(),
            title: format!("{key} title"),
            description: None,
            assignee: None,
            status: None,
            last_comment: None,
        }
    }

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn story_points_follow_the_scale() {
        assert_eq!(StoryPoints::try_from(13).map(StoryPoints::value), Ok(13));
        assert_eq!(StoryPoints::try_from(4), Err(InvalidStoryPoints(4)));
    }

    #[test]
    fn confirm_reprompts_and_honours_default() {
        let mut p = prompter("maybe\nYES\n\n");
        assert!(p.confirm("Ok?", false).unwrap());
        assert!(!p.confirm("Ok?", false).unwrap());

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("Please enter 'y' or 'n'"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = prompter("");
        let err = p.confirm("Ok?", true).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(1, 2, 4), "Progress: [██░░] 50.0%");
        assert_eq!(progress_bar(0, 0, 2), "Progress: [░░] 0.0%");
    }

    #[test]
    fn review_scores_items_and_asks_points_when_ready_enough() {
        // item 1: y n y -> 75.0, points 5, continue; item 2: n n n -> 0.0
        let mut p = prompter("y\nn\ny\n7\n5\n\nn\nn\nn\n");
        let reviewed =
            review_backlog(&mut p, &questionnaire(), &[item("P-1"), item("P-2")], 75.0).unwrap();

        assert_eq!(reviewed.len(), 2);
        assert_eq!(reviewed[0].score.value(), 75.0);
        assert_eq!(reviewed[0].level, ReadinessLevel::MinorRefinementNeeded);
        assert_eq!(reviewed[0].story_points.map(StoryPoints::value), Some(5));
        assert_eq!(reviewed[0].title.as_deref(), Some("P-1 title"));
        assert_eq!(reviewed[1].score.value(), 0.0);
        assert!(reviewed[1].story_points.is_none());

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("7 is not on the story point scale"));
    }

    #[test]
    fn review_stops_when_reviewer_declines_to_continue() {
        let mut p = prompter("n\nn\nn\nno\n");
        let reviewed =
            review_backlog(&mut p, &questionnaire(), &[item("P-1"), item("P-2")], 75.0).unwrap();
        assert_eq!(reviewed.len(), 1);
        assert_eq!(reviewed[0].item, "P-1");
    }

    #[test]
    fn assessment_reports_category_statistics() {
        let mut p = prompter("y\ny\nn\n");
        let report = run_assessment(&mut p, &questionnaire()).unwrap();

        assert_eq!(report.evaluation.score.value(), 50.0);
        assert_eq!(report.statistics.overall.implemented, 2);
        assert_eq!(report.statistics.by_category.len(), 2);
        assert_eq!(report.statistics.by_category[0].score.value(), 100.0);

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("Questions answered: 2/3"));
    }
}
