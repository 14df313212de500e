mod cli;
mod config;
mod core;
mod presets;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{AssessArgs, Cli, Commands, ReviewArgs, ScoreArgs, SetArgs};
use core::review::{BacklogItem, Prompter};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Where interactive prompts go. JSON mode keeps stdout for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptStream {
    Stdout,
    Stderr,
}

impl PromptStream {
    fn for_output(json: bool) -> Self {
        if json { Self::Stderr } else { Self::Stdout }
    }

    fn writer(self) -> Box<dyn Write> {
        match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::Stderr => Box::new(io::stderr()),
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Init => {
            let path = std::env::current_dir()?.join(config::CONFIG_FILE_NAME);
            config::write_default_config(&path)?;
            println!("created {}", path.display());
            Ok(0)
        }
        Commands::Questions(args) => list_questions(args),
        Commands::Score(args) => score(args),
        Commands::Review(args) => review(args),
        Commands::Assess(args) => assess(args),
    }
}

fn load(config_path: Option<&Path>) -> Result<config::Config> {
    let cwd = std::env::current_dir()?;
    let loaded = config::load_config(config_path, &cwd)?;
    if let Some(source) = &loaded.source {
        info!(config = %source.display(), "loaded config");
    }
    Ok(loaded.config)
}

fn list_questions(args: SetArgs) -> Result<i32> {
    let cfg = load(args.config.as_deref())?;
    let questionnaire = cfg.questionnaire(args.set.as_deref())?;

    if args.json || cfg.general.json {
        println!("{}", serde_json::to_string_pretty(&questionnaire)?);
        return Ok(0);
    }

    println!("{} ({})", questionnaire.title(), questionnaire.name());
    for (idx, question) in questionnaire.questions().iter().enumerate() {
        println!(
            "{:>3}. [{}] {} (weight {}, {})",
            idx + 1,
            question.key(),
            question.text,
            question.weight,
            question.category
        );
    }
    println!("total weight: {}", questionnaire.total_weight());
    Ok(0)
}

fn score(args: ScoreArgs) -> Result<i32> {
    let cfg = load(args.set.config.as_deref())?;
    let questionnaire = cfg.questionnaire(args.set.set.as_deref())?;
    let report = core::run_batch(&args.answers, &questionnaire, &cfg)?;

    if args.set.json || cfg.general.json {
        let json_report = core::report::JsonReport::from(&report);
        println!("{}", serde_json::to_string_pretty(&json_report)?);
    } else {
        core::report::print_human(&report);
    }

    if report.exit.ok { Ok(0) } else { Ok(1) }
}

fn review(args: ReviewArgs) -> Result<i32> {
    let cfg = load(args.set.config.as_deref())?;
    let questionnaire = cfg.questionnaire(args.set.set.as_deref())?;
    let items: Vec<BacklogItem> = utils::fs::read_json(&args.items)
        .with_context(|| format!("failed loading backlog items from {}", args.items.display()))?;
    info!(items = items.len(), questionnaire = questionnaire.name(), "starting review");

    let json = args.set.json || cfg.general.json;
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), PromptStream::for_output(json).writer());
    let reviewed = core::review::review_backlog(
        &mut prompter,
        &questionnaire,
        &items,
        cfg.general.story_points_from,
    )?;

    let report = core::report::FinalReport::new(&questionnaire, reviewed, Vec::new(), &cfg);
    utils::fs::write_text(&args.output, &core::report::render_markdown(&report))?;
    info!(output = %args.output.display(), "generated grooming report");

    if json {
        let json_report = core::report::JsonReport::from(&report);
        println!("{}", serde_json::to_string_pretty(&json_report)?);
    } else {
        core::report::print_human(&report);
        println!("report written to {}", args.output.display());
    }

    if report.exit.ok { Ok(0) } else { Ok(1) }
}

fn assess(args: AssessArgs) -> Result<i32> {
    let cfg = load(args.config.as_deref())?;
    let questionnaire = cfg.questionnaire(Some(&args.set))?;

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let report = core::review::run_assessment(&mut prompter, &questionnaire)?;

    core::report::print_assessment(&report);
    if let Some(output) = &args.output {
        utils::fs::write_text(output, &serde_json::to_string_pretty(&report)?)?;
        println!("JSON report saved to {}", output.display());
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_moves_prompts_off_stdout() {
        assert_eq!(PromptStream::for_output(true), PromptStream::Stderr);
        assert_eq!(PromptStream::for_output(false), PromptStream::Stdout);
    }
}
