pub mod args;
pub mod commands;

pub use args::{ResolveArgs, RunArgs};
use crate::core::config::ConfigLoader;
use crate::logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "kpt-kcl")]
#[command(version = crate::VERSION)]
#[command(about = "kpt function that runs KCL programs over a ResourceList")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Without a command the function reads a ResourceList on stdin and writes the result to stdout."
)]
pub struct Args {
    /// Runtime config file (TOML); defaults to $KPT_KCL_CONFIG when set
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Transform a ResourceList (default)",
        long_about = "Run resolves the functionConfig, evaluates the KCL source over the items and writes the resulting ResourceList. Failures are reported in `results` with exit status 1.",
        after_help = "Example:\n    kpt-kcl run --input resources.yaml"
    )]
    Run(RunArgs),
    #[command(
        about = "Print the resolved KCLRun descriptor",
        long_about = "Resolve reads a ResourceList, applies functionConfig defaulting and validation, and prints the canonical descriptor as YAML.",
        after_help = "Example:\n    kpt-kcl resolve --input resources.yaml"
    )]
    Resolve(ResolveArgs),
}

/// How the invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The function failed and the failure was written to `results`.
    FunctionFailed,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::FunctionFailed => ExitCode::FAILURE,
        }
    }
}

pub fn run(args: Args) -> crate::Result<Outcome> {
    let config = ConfigLoader::load(args.config.as_deref())?;
    logging::init(&config.logging)?;

    match args
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()))
    {
        Command::Run(run_args) => commands::run(run_args, &config),
        Command::Resolve(resolve_args) => commands::resolve(resolve_args).map(|_| Outcome::Success),
    }
}
