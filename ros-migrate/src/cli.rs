use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ros-migrate")]
#[command(about = "Migrate RouterOS export configurations between router models")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Convert one export from a source model to a target model.
    Convert(ConvertArgs),
    /// Show what a migration would extract and remap, without converting.
    Inspect(InspectArgs),
    /// List known model profiles.
    Profiles(ProfilesArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Export file to convert.
    pub input: PathBuf,
    /// Output file. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Source model profile id (for example 1036).
    #[arg(long)]
    pub from: String,
    /// Target model profile id (for example 2004).
    #[arg(long)]
    pub to: String,
    /// Optional profiles directory; every *.toml overrides the built-in profile with the same id.
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
    /// Summary format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Suppress the summary.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Export file to inspect.
    pub file: PathBuf,
    /// Target profile id; shows the interface mapping it would produce.
    #[arg(long)]
    pub to: Option<String>,
    /// Source profile id, used with --to for fixed-name targets.
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// Show the per-section inventory.
    #[arg(long)]
    pub sections: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Optional profiles directory.
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    /// Optional profiles directory.
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
