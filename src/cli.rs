use crate::formatting::{ColorMode, EmojiMode, FormattingConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "review-council")]
#[command(about = "Multi-task code review pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (default: nearest .review-council.toml)
    #[arg(long, global = true, env = "REVIEW_COUNCIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorMode>,

    /// When to use emoji
    #[arg(long, value_enum, global = true)]
    pub emoji: Option<EmojiMode>,

    /// ASCII-only output, no colors or emoji
    #[arg(long, global = true, conflicts_with_all = ["color", "emoji"])]
    pub plain: bool,

    /// Hide progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    /// `--plain`, then explicit modes, then the environment.
    pub fn formatting(&self) -> FormattingConfig {
        if self.plain {
            return FormattingConfig::plain();
        }
        let mut config = FormattingConfig::from_env();
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(emoji) = self.emoji {
            config.emoji = emoji;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a single file
    Review(ReviewArgs),

    /// Review every matching file under a directory
    Batch(BatchArgs),

    /// Run the full pipeline on a built-in sample with canned task output
    Demo(DemoArgs),

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    /// File to review
    pub file: PathBuf,

    /// Path for the detailed report (default: <stem>_review_<timestamp>.txt)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Path for the JSON results
    #[arg(long, default_value = crate::io::RESULTS_FILE)]
    pub json: PathBuf,

    /// Print the summary only, write no files
    #[arg(long)]
    pub no_save: bool,

    /// Use canned task output instead of the API
    #[arg(long)]
    pub demo: bool,

    /// Tasks to skip, by config key (e.g. documentation,testing)
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Print per-stage timings after the summary
    #[arg(long)]
    pub timings: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory to walk
    pub directory: PathBuf,

    /// File extensions to review
    #[arg(long, value_delimiter = ',', default_value = "py,js,java,cpp,c")]
    pub extensions: Vec<String>,

    /// Files reviewed at the same time (default: number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Path for the batch JSON (default: BatchReview_<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use canned task output instead of the API
    #[arg(long)]
    pub demo: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// Save the detailed report and JSON results
    #[arg(long)]
    pub save: bool,

    /// Path for the JSON results when saving
    #[arg(long, default_value = "DemoResults.json")]
    pub json: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_review_args_parse() {
        let cli = Cli::parse_from([
            "review-council",
            "-vv",
            "review",
            "app.py",
            "--disable",
            "documentation,testing",
            "--plain",
        ]);

        assert_eq!(cli.global.verbosity, 2);
        assert!(cli.global.plain);
        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.file, PathBuf::from("app.py"));
                assert_eq!(args.disable, vec!["documentation", "testing"]);
                assert_eq!(args.json, PathBuf::from("ReviewResults.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_batch_default_extensions() {
        let cli = Cli::parse_from(["review-council", "batch", "src"]);
        match cli.command {
            Commands::Batch(args) => {
                assert_eq!(args.extensions, vec!["py", "js", "java", "cpp", "c"]);
                assert_eq!(args.jobs, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_plain_overrides_formatting() {
        let cli = Cli::parse_from(["review-council", "--plain", "demo"]);
        assert_eq!(cli.global.formatting(), FormattingConfig::plain());
    }
}
