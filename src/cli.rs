use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "readycheck",
    version,
    about = "Weighted yes/no questionnaires for grooming readiness and DevOps maturity"
)]
pub struct Cli {
    /// Log progress to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default readycheck.toml in the current directory.
    Init,
    /// List the questions of a questionnaire.
    Questions(SetArgs),
    /// Score answer files (a file or a directory of *.json).
    Score(ScoreArgs),
    /// Review backlog items interactively and write a markdown report.
    Review(ReviewArgs),
    /// Run a maturity self-assessment interactively.
    Assess(AssessArgs),
}

#[derive(Debug, Args, Clone)]
pub struct SetArgs {
    /// Questionnaire name; defaults to general.default_set.
    #[arg(long)]
    pub set: Option<String>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub set: SetArgs,
    #[arg(long)]
    pub answers: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub set: SetArgs,
    /// JSON array of backlog items.
    #[arg(long)]
    pub items: PathBuf,
    #[arg(long, default_value = "grooming_results.md")]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct AssessArgs {
    #[arg(long, default_value = "devops")]
    pub set: String,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Also save the result as JSON.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_score_with_flattened_set_args() {
        let cli = Cli::parse_from([
            "readycheck",
            "score",
            "--answers",
            "reviews",
            "--set",
            "devops",
            "--json",
        ]);
        let Commands::Score(args) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.answers, PathBuf::from("reviews"));
        assert_eq!(args.set.set.as_deref(), Some("devops"));
        assert!(args.set.json);
    }

    #[test]
    fn init_takes_no_config_flag() {
        let cli = Cli::parse_from(["readycheck", "init"]);
        assert!(matches!(cli.command, Commands::Init));
        assert!(Cli::try_parse_from(["readycheck", "init", "--config", "x.toml"]).is_err());
    }

    #[test]
    fn review_output_has_default() {
        let cli = Cli::parse_from(["readycheck", "review", "--items", "backlog.json"]);
        let Commands::Review(args) = cli.command else {
            panic!("expected review command");
        };
        assert_eq!(args.output, PathBuf::from("grooming_results.md"));
    }
}
