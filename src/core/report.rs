use crate::config::Config;
use crate::core::questionnaire::Questionnaire;
use crate::core::review::StoryPoints;
use crate::core::score::{AnswerSet, ReadinessLevel, Score, ScoreError};
use crate::core::stats::{Breakdown, Tally};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

trait LevelStyle {
    fn colored(self) -> String;
}

impl LevelStyle for ReadinessLevel {
    fn colored(self) -> String {
        match self {
            Self::Ready => self.as_str().green().bold().to_string(),
            Self::MinorRefinementNeeded => self.as_str().cyan().bold().to_string(),
            Self::NeedsDiscussion => self.as_str().yellow().bold().to_string(),
            Self::SignificantRefinementRequired => self.as_str().red().bold().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnsweredQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub category: String,
    pub weight: f64,
    pub answer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub score: Score,
    pub level: ReadinessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<StoryPoints>,
    pub answers: Vec<AnsweredQuestion>,
}

impl Evaluation {
    pub fn new(
        item: impl Into<String>,
        questionnaire: &Questionnaire,
        answers: &AnswerSet,
    ) -> Result<Self, ScoreError> {
        let (score, level) = questionnaire.evaluate(answers)?;
        let answers = questionnaire
            .questions()
            .iter()
            .zip(answers.iter())
            .map(|(question, answer)| AnsweredQuestion {
                id: question.id.clone(),
                text: question.text.clone(),
                category: question.category.clone(),
                weight: question.weight,
                answer,
            })
            .collect();

        Ok(Self {
            item: item.into(),
            title: None,
            score,
            level,
            story_points: None,
            answers,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_story_points(mut self, points: StoryPoints) -> Self {
        self.story_points = Some(points);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedItem {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Counts {
    pub ready: usize,
    pub minor_refinement: usize,
    pub needs_discussion: usize,
    pub significant_refinement: usize,
    pub failed: usize,
    pub total: usize,
}

impl Counts {
    pub fn from_results(evaluations: &[Evaluation], failures: &[FailedItem]) -> Self {
        let mut counts = Self::default();
        for evaluation in evaluations {
            *counts.slot_mut(evaluation.level) += 1;
        }
        counts.failed = failures.len();
        counts.total = evaluations.len() + failures.len();
        counts
    }

    pub fn for_level(&self, level: ReadinessLevel) -> usize {
        match level {
            ReadinessLevel::Ready => self.ready,
            ReadinessLevel::MinorRefinementNeeded => self.minor_refinement,
            ReadinessLevel::NeedsDiscussion => self.needs_discussion,
            ReadinessLevel::SignificantRefinementRequired => self.significant_refinement,
        }
    }

    fn slot_mut(&mut self, level: ReadinessLevel) -> &mut usize {
        match level {
            ReadinessLevel::Ready => &mut self.ready,
            ReadinessLevel::MinorRefinementNeeded => &mut self.minor_refinement,
            ReadinessLevel::NeedsDiscussion => &mut self.needs_discussion,
            ReadinessLevel::SignificantRefinementRequired => &mut self.significant_refinement,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExitStatus {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl ExitStatus {
    pub fn reason_line(&self) -> String {
        self.reasons.join("; ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub questionnaire: String,
    pub min_score: f64,
}

#[derive(Debug, Clone)]
pub struct FinalReport {
    pub title: String,
    pub generated_at: String,
    pub evaluations: Vec<Evaluation>,
    pub failures: Vec<FailedItem>,
    pub counts: Counts,
    pub config: ConfigSummary,
    pub exit: ExitStatus,
}

impl FinalReport {
    pub fn new(
        questionnaire: &Questionnaire,
        evaluations: Vec<Evaluation>,
        failures: Vec<FailedItem>,
        cfg: &Config,
    ) -> Self {
        let counts = Counts::from_results(&evaluations, &failures);
        let exit = evaluate_exit(&evaluations, &failures, cfg);

        Self {
            title: questionnaire.title().to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            evaluations,
            failures,
            counts,
            config: ConfigSummary {
                questionnaire: questionnaire.name().to_string(),
                min_score: cfg.general.min_score,
            },
            exit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub title: String,
    pub generated_at: String,
    pub counts: Counts,
    pub evaluations: Vec<Evaluation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedItem>,
    pub config: ConfigSummary,
}

impl From<&FinalReport> for JsonReport {
    fn from(report: &FinalReport) -> Self {
        Self {
            title: report.title.clone(),
            generated_at: report.generated_at.clone(),
            counts: report.counts.clone(),
            evaluations: report.evaluations.clone(),
            failures: report.failures.clone(),
            config: report.config.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub title: String,
    pub generated_at: String,
    pub evaluation: Evaluation,
    pub statistics: Breakdown,
}

pub fn evaluate_exit(
    evaluations: &[Evaluation],
    failures: &[FailedItem],
    cfg: &Config,
) -> ExitStatus {
    let mut reasons = Vec::new();

    for evaluation in evaluations {
        if evaluation.score.value() < cfg.general.min_score {
            reasons.push(format!(
                "{} scored {} below min_score {}",
                evaluation.item, evaluation.score, cfg.general.min_score
            ));
        }
    }

    if !failures.is_empty() {
        reasons.push(format!("{} item(s) could not be scored", failures.len()));
    }

    ExitStatus {
        ok: reasons.is_empty(),
        reasons,
    }
}

pub fn print_human(report: &FinalReport) {
    println!("{} ({} items)", report.title.bold(), report.counts.total);

    for level in ReadinessLevel::ALL {
        let grouped: Vec<&Evaluation> = report
            .evaluations
            .iter()
            .filter(|evaluation| evaluation.level == level)
            .collect();

        if grouped.is_empty() {
            continue;
        }

        println!();
        println!("{} ({})", level.colored(), grouped.len());

        for evaluation in grouped {
            let title = evaluation
                .title
                .as_deref()
                .map(|title| format!(" - {}", title))
                .unwrap_or_default();
            let points = evaluation
                .story_points
                .map(|points| format!(" [{} pts]", points))
                .unwrap_or_default();
            println!(
                "{:>6}%  {}{}{}",
                evaluation.score.to_string(),
                evaluation.item,
                title,
                points
            );
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("{} ({})", "FAILED".red().bold(), report.failures.len());
        for failure in &report.failures {
            println!("{}", failure.source);
            println!("-> {}", failure.error);
        }
    }

    println!();
    if report.exit.ok {
        println!("exit: OK");
    } else {
        println!("exit: FAILED ({})", report.exit.reason_line());
    }
}

pub fn print_assessment(report: &AssessmentReport) {
    println!("{}", report.title.bold());
    println!("Report generated on: {}", report.generated_at);
    println!();
    print_tally("Overall Progress", &report.statistics.overall, "");

    for group in &report.statistics.by_group {
        println!();
        print_tally(&group.label, group, "");

        for category in report
            .statistics
            .by_category
            .iter()
            .filter(|category| crate::core::stats::group_of(&category.label) == group.label)
        {
            println!();
            print_tally(&category.label, category, "  ");
            for answered in report
                .evaluation
                .answers
                .iter()
                .filter(|answered| answered.category == category.label)
            {
                let status = if answered.answer {
                    "✓".green().to_string()
                } else {
                    "✗".red().to_string()
                };
                let id = answered
                    .id
                    .as_deref()
                    .map(|id| format!("[{}] ", id))
                    .unwrap_or_default();
                println!("    {} {}{}", status, id, answered.text);
            }
        }
    }

    println!();
    println!(
        "Readiness: {}% ({})",
        report.evaluation.score,
        report.evaluation.level.colored()
    );
}

fn print_tally(label: &str, tally: &Tally, indent: &str) {
    println!("{}{}:", indent, label.bold());
    println!(
        "{}Progress: {}/{} ({}%)",
        indent, tally.implemented, tally.total, tally.score
    );
}

pub fn render_markdown(report: &FinalReport) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail.
    let _ = writeln!(out, "# {} Session Results\n", report.title);
    let _ = writeln!(out, "Generated on: {}\n", report.generated_at);

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(
        out,
        "| Total Items Reviewed | {} |",
        report.evaluations.len()
    );
    for level in ReadinessLevel::ALL {
        let _ = writeln!(out, "| {} | {} |", level, report.counts.for_level(level));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Detailed Results\n");
    for evaluation in &report.evaluations {
        match &evaluation.title {
            Some(title) => {
                let _ = writeln!(out, "### [{}] {}\n", evaluation.item, title);
            }
            None => {
                let _ = writeln!(out, "### [{}]\n", evaluation.item);
            }
        }
        let _ = writeln!(out, "**Score:** {}%  ", evaluation.score);
        let _ = writeln!(out, "**Readiness Level:** {}  ", evaluation.level);
        if let Some(points) = evaluation.story_points {
            let _ = writeln!(out, "**Story Points:** {}  ", points);
        }
        let _ = writeln!(out, "\n**Evaluation Details:**\n");
        for answered in &evaluation.answers {
            let mark = if answered.answer { "✅" } else { "❌" };
            let _ = writeln!(out, "- {}: {}", answered.text, mark);
        }
        let _ = writeln!(out, "\n---\n");
    }

    out
}
