use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-sabvqc",
    version,
    about = "Sex-consideration evidence QC for guideline citations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Patterns(PatternsArgs),
    Scenarios(ScenariosArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Citations TSV (.gz accepted)")]
    pub citations: PathBuf,

    #[arg(long, help = "Trial registry TSV (.gz accepted)")]
    pub trials: PathBuf,

    #[arg(long, help = "Optional guideline metadata TSV")]
    pub guidelines: Option<PathBuf>,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Pattern group TSV to overlay on built-in groups")]
    pub patterns: Option<PathBuf>,

    #[arg(long, help = "Scenario JSON to overlay on built-in scenarios")]
    pub scenarios: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(
        long,
        default_value_t = 80,
        help = "Characters of context on each side of a snippet match"
    )]
    pub snippet_chars: usize,
}

#[derive(Debug, Args)]
pub struct PatternsArgs {
    #[command(subcommand)]
    pub command: PatternsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PatternsCommand {
    Show(PatternsShowArgs),
}

#[derive(Debug, Args)]
pub struct PatternsShowArgs {
    #[arg(long, help = "Optional pattern group TSV to overlay on built-in groups")]
    pub patterns: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ScenariosArgs {
    #[command(subcommand)]
    pub command: ScenariosCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScenariosCommand {
    Show(ScenariosShowArgs),
}

#[derive(Debug, Args)]
pub struct ScenariosShowArgs {
    #[arg(long, help = "Optional scenario JSON to overlay on built-in scenarios")]
    pub scenarios: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub citations: PathBuf,

    #[arg(long)]
    pub trials: PathBuf,

    #[arg(long)]
    pub guidelines: Option<PathBuf>,
}
