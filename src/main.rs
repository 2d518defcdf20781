use clap::Parser;
use keel::cli::{self, Args};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> keel::Result<bool> {
    let workspace = env::current_dir().ok();
    let _logging = keel::logging::init(workspace.as_deref())?;
    cli::run(args)
}
