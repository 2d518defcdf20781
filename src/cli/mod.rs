pub mod args;
pub mod commands;

pub use args::{BuildArgs, ExportArgs, LastRevisionArgs, RunArgs, TargetArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
TASK COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(version = crate::VERSION)]
#[command(about = "Run version-control build tasks with level-filtered build logging")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Build output goes to the sink selected by the sink.* properties (a file named phing.log by default)."
)]
pub struct Args {
    #[command(flatten)]
    pub build: BuildArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Run any client subcommand",
        long_about = "Run executes the client in the given mode against the configured target and logs every output line.",
        after_help = "Example:\n    keel run info --working-copy ./checkout -D sink.type=console"
    )]
    Run(RunArgs),
    #[command(
        about = "Store the current revision in a property",
        long_about = "LastRevision runs `info` and records the revision (or last changed revision) of the target.",
        after_help = "Example:\n    keel last-revision --repository-url http://svn.example.org/repo"
    )]
    LastRevision(LastRevisionArgs),
    #[command(
        about = "Export a clean tree",
        long_about = "Export copies an unversioned tree of the target into the destination directory.",
        after_help = "Example:\n    keel export --working-copy ./checkout --to-dir ./dist --force"
    )]
    Export(ExportArgs),
}

/// Execute the parsed command. Returns `false` when the build failed.
pub fn run(args: Args) -> crate::Result<bool> {
    commands::execute(args)
}
