use crate::core::types::Priority;
use crate::core::vcs::DEFAULT_EXECUTABLE;
use clap::Args;
use std::path::PathBuf;

/// Options shared by every command: build properties and log verbosity.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Most verbose message priority written to the build log
    #[arg(long, global = true, default_value = "info", value_name = "LEVEL")]
    pub level: Priority,

    /// Define a build property (repeatable), e.g. -D sink.type=console
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE")]
    pub define: Vec<String>,

    /// TOML file with build properties; nested tables become dotted keys
    #[arg(long, global = true, value_name = "FILE")]
    pub property_file: Option<PathBuf>,

    /// Project name reported to the build log
    #[arg(long, global = true, default_value = "keel", value_name = "NAME")]
    pub project: String,
}

/// Where the version-control command points.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Local working copy to operate on
    #[arg(long, value_name = "PATH")]
    pub working_copy: Option<String>,

    /// Repository URL; takes precedence over --working-copy
    #[arg(long, value_name = "URL")]
    pub repository_url: Option<String>,

    /// Path to the version-control client
    #[arg(long, default_value = DEFAULT_EXECUTABLE, value_name = "PATH")]
    pub executable: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Subcommand passed to the client (info, log, status, ...)
    #[arg(value_name = "MODE")]
    pub mode: String,

    /// Extra arguments appended after the target; put them after `--` when they start with a dash
    #[arg(trailing_var_arg = true, value_name = "ARGS")]
    pub args: Vec<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct LastRevisionArgs {
    /// Property receiving the revision
    #[arg(long, default_value = "svn.lastrevision", value_name = "NAME")]
    pub property: String,

    /// Report the last changed revision instead of the current one
    #[arg(long)]
    pub last_changed: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination directory for the exported tree
    #[arg(long, value_name = "DIR")]
    pub to_dir: String,

    /// Overwrite existing files in the destination
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}
