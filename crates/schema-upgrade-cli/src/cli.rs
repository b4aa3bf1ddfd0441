use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Upgrades legacy GraphQL-Ruby type definitions to the class-based API.
///
/// Rewrites `X = GraphQL::ObjectType.define do ... end` blocks and the
/// declarations inside them into `class X < Types::BaseObject` classes.
/// Anything the rules do not recognize is left exactly as it was.
#[derive(Parser)]
#[command(
    name = "schema-upgrade",
    version,
    about = "Upgrade legacy GraphQL-Ruby type definitions to class-based syntax",
    after_help = "Use 'schema-upgrade <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: SCHEMA_UPGRADE_CONFIG]
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "SCHEMA_UPGRADE_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Upgrade legacy definitions in Ruby files
    Upgrade(UpgradeArgs),

    /// Fail when any file still contains legacy definitions
    Check(CheckArgs),

    /// List the rewrite rules in pipeline order
    Rules(RulesArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// ---------------------------------------------------------------------------
// Individual command argument structs
// ---------------------------------------------------------------------------

/// Pipeline settings that override the config file.
#[derive(Args, Debug, Default)]
pub struct PipelineOpts {
    /// Namespace of the base classes (default: Types)
    #[arg(long = "base-namespace", value_name = "NAMESPACE")]
    pub base_namespace: Option<String>,

    /// Leave a rule out of the pipeline (repeatable)
    #[arg(long = "disable", value_name = "RULE")]
    pub disable: Vec<String>,
}

/// Arguments for `schema-upgrade upgrade`.
#[derive(Args)]
pub struct UpgradeArgs {
    /// Ruby files or directories to upgrade (default: [cli] default_dir)
    pub paths: Vec<PathBuf>,

    /// Rewrite the files in place (default is a dry run)
    #[arg(short = 'w', long = "write")]
    pub write: bool,

    /// Write without asking for confirmation
    #[arg(short = 'f', long = "force", requires = "write")]
    pub force: bool,

    /// Print a diff for each changed file, also when writing
    #[arg(short = 'd', long = "diff")]
    pub diff: bool,

    #[command(flatten)]
    pub pipeline: PipelineOpts,
}

/// Arguments for `schema-upgrade check`.
#[derive(Args)]
pub struct CheckArgs {
    /// Ruby files or directories to check (default: [cli] default_dir)
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineOpts,
}

/// Arguments for `schema-upgrade rules`.
#[derive(Args)]
pub struct RulesArgs {
    #[command(flatten)]
    pub pipeline: PipelineOpts,
}

/// Arguments for `schema-upgrade completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_parser = ["bash", "zsh", "fish", "powershell", "elvish"])]
    pub shell: String,
}
