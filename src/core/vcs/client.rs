#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use indexmap::IndexMap;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How command output is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Raw stdout only.
    Raw,
    /// Raw stdout plus `Key: Value` records.
    #[default]
    Associative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub fetch_mode: FetchMode,
    pub executable_path: String,
}

/// Output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VcsOutput {
    pub stdout: String,
    /// One map per blank-line separated block of `Key: Value` lines.
    pub records: Vec<IndexMap<String, String>>,
}

impl VcsOutput {
    /// First value recorded under `key`, searching records in order.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.records
            .iter()
            .find_map(|record| record.get(key))
            .map(String::as_str)
    }
}

/// Failure reported by a client. `message` is absent when no detail is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFailure {
    pub message: Option<String>,
}

impl ClientFailure {
    pub fn with_message<T: Into<String>>(message: T) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unknown() -> Self {
        Self { message: None }
    }
}

/// A version-control client bound to one subcommand.
pub trait VcsClient {
    fn run(&mut self, args: &[String]) -> Result<VcsOutput, ClientFailure>;
}

/// Creates clients for a mode.
pub trait ClientFactory {
    /// Whether the backend behind `options` can be used at all.
    fn is_available(&self, options: &ClientOptions) -> bool;

    fn create(&self, mode: &str, options: ClientOptions) -> Result<Box<dyn VcsClient>, AppError>;
}

/// Runs the `svn` command-line client as a subprocess.
pub struct SvnClient {
    mode: String,
    options: ClientOptions,
}

impl SvnClient {
    pub fn new(mode: &str, options: ClientOptions) -> Self {
        Self {
            mode: mode.to_string(),
            options,
        }
    }
}

impl VcsClient for SvnClient {
    fn run(&mut self, args: &[String]) -> Result<VcsOutput, ClientFailure> {
        tracing::debug!(
            executable = %self.options.executable_path,
            mode = %self.mode,
            ?args,
            "spawning version-control command"
        );
        let output = Command::new(&self.options.executable_path)
            .arg(&self.mode)
            .args(args)
            .output()
            .map_err(|e| {
                ClientFailure::with_message(format!(
                    "unable to execute '{}': {}",
                    self.options.executable_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(status = ?output.status.code(), %stderr, "version-control command failed");
            return Err(if stderr.is_empty() {
                ClientFailure::unknown()
            } else {
                ClientFailure::with_message(stderr)
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let records = match self.options.fetch_mode {
            FetchMode::Raw => Vec::new(),
            FetchMode::Associative => parse_records(&stdout),
        };
        Ok(VcsOutput { stdout, records })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SvnClientFactory;

impl ClientFactory for SvnClientFactory {
    fn is_available(&self, options: &ClientOptions) -> bool {
        resolve_executable(&options.executable_path).is_some()
    }

    fn create(&self, mode: &str, options: ClientOptions) -> Result<Box<dyn VcsClient>, AppError> {
        Ok(Box::new(SvnClient::new(mode, options)))
    }
}

/// Locate an executable: a path with separators must exist as a file, a bare name is looked
/// up on `PATH`.
pub fn resolve_executable(executable: &str) -> Option<PathBuf> {
    let candidate = Path::new(executable);
    if executable.is_empty() {
        return None;
    }
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let search_path = env::var_os("PATH")?;
    env::split_paths(&search_path)
        .map(|dir| dir.join(candidate))
        .find(|path| path.is_file())
}

/// Split `Key: Value` output into records separated by blank lines.
pub fn parse_records(stdout: &str) -> Vec<IndexMap<String, String>> {
    let mut records = Vec::new();
    let mut current = IndexMap::new();
    for line in stdout.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(": ") {
            current.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}
