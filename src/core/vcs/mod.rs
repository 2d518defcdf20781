#![allow(clippy::result_large_err)]

mod client;
mod tasks;

pub use client::{
    parse_records, resolve_executable, ClientFactory, ClientFailure, ClientOptions, FetchMode,
    SvnClient, SvnClientFactory, VcsClient, VcsOutput,
};
pub use tasks::{CommandTask, ExportTask, LastRevisionTask};

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::path::Path;

/// Metadata entry marking a directory as a working copy.
pub const METADATA_DIR: &str = ".svn";

#[cfg(windows)]
pub const DEFAULT_EXECUTABLE: &str = "C:\\Program Files\\Subversion\\bin\\svn.exe";
#[cfg(not(windows))]
pub const DEFAULT_EXECUTABLE: &str = "/usr/bin/svn";

/// Shared state and plumbing for tasks that shell out to the version-control client.
///
/// Call [`setup`](Self::setup) once per mode, then [`run`](Self::run) as often as needed.
pub struct VcsCommandTask {
    working_copy: String,
    repository_url: String,
    executable_path: String,
    mode: String,
    client: Option<Box<dyn VcsClient>>,
    base_args: Vec<String>,
    factory: Box<dyn ClientFactory>,
}

impl VcsCommandTask {
    pub fn new() -> Self {
        Self::with_factory(Box::new(SvnClientFactory))
    }

    pub fn with_factory(factory: Box<dyn ClientFactory>) -> Self {
        Self {
            working_copy: String::new(),
            repository_url: String::new(),
            executable_path: DEFAULT_EXECUTABLE.to_string(),
            mode: String::new(),
            client: None,
            base_args: Vec::new(),
            factory,
        }
    }

    pub fn set_working_copy<T: Into<String>>(&mut self, working_copy: T) {
        self.working_copy = working_copy.into();
    }

    pub fn working_copy(&self) -> &str {
        &self.working_copy
    }

    pub fn set_repository_url<T: Into<String>>(&mut self, repository_url: T) {
        self.repository_url = repository_url.into();
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn set_executable_path<T: Into<String>>(&mut self, executable_path: T) {
        self.executable_path = executable_path.into();
    }

    pub fn executable_path(&self) -> &str {
        &self.executable_path
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }

    /// Name of the client binary used in error messages, e.g. `svn`.
    pub fn vcs_binary(&self) -> String {
        Path::new(&self.executable_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.executable_path.clone())
    }

    fn options(&self) -> ClientOptions {
        ClientOptions {
            fetch_mode: FetchMode::Associative,
            executable_path: self.executable_path.clone(),
        }
    }

    /// Verify the client backend is installed.
    pub fn init(&self) -> Result<(), AppError> {
        if self.factory.is_available(&self.options()) {
            return Ok(());
        }
        Err(AppError::new(
            ErrorCategory::DependencyMissing,
            format!(
                "Version control client '{}' is not available; install it or set the executable path",
                self.executable_path
            ),
        ))
    }

    /// Create a client for `mode` and resolve the target argument.
    ///
    /// A repository URL takes precedence over a working copy. With neither set the base
    /// arguments stay empty and the client decides whether that is acceptable.
    pub fn setup(&mut self, mode: &str) -> Result<(), AppError> {
        self.mode = mode.to_string();
        self.client = None;
        let client = self.factory.create(mode, self.options())?;

        let base_args = if !self.repository_url.is_empty() {
            vec![self.repository_url.clone()]
        } else if !self.working_copy.is_empty() {
            self.check_working_copy()?;
            vec![self.working_copy.clone()]
        } else {
            Vec::new()
        };

        tracing::debug!(mode, ?base_args, "version-control task ready");
        self.client = Some(client);
        self.base_args = base_args;
        Ok(())
    }

    fn check_working_copy(&self) -> Result<(), AppError> {
        let path = Path::new(&self.working_copy);
        if !path.is_dir() {
            return Err(AppError::new(
                ErrorCategory::InvalidWorkingCopy,
                format!("'{}' is not a directory", self.working_copy),
            ));
        }
        if !path.join(METADATA_DIR).exists() {
            return Err(AppError::new(
                ErrorCategory::NotAWorkingCopy,
                format!("'{}' doesn't seem to be a working copy", self.working_copy),
            ));
        }
        Ok(())
    }

    /// Run the configured command with the base arguments followed by `extra_args`.
    pub fn run(&mut self, extra_args: Option<&[String]>) -> Result<VcsOutput, AppError> {
        let command = format!("{} {}", self.vcs_binary(), self.mode);
        let client = self.client.as_mut().ok_or_else(|| {
            AppError::new(
                ErrorCategory::InternalError,
                format!("Cannot run '{}': setup has not been called", command),
            )
        })?;

        let mut args = self.base_args.clone();
        if let Some(extra) = extra_args {
            args.extend(extra.iter().cloned());
        }

        client.run(&args).map_err(|failure| match failure.message {
            Some(message) => AppError::new(
                ErrorCategory::VcsCommandError,
                format!("Failed to run the '{}' command: {}", command, message),
            ),
            None => AppError::new(
                ErrorCategory::UnknownCommandFailure,
                format!(
                    "Failed to run the '{}' command: no error details were reported",
                    command
                ),
            ),
        })
    }
}

impl Default for VcsCommandTask {
    fn default() -> Self {
        Self::new()
    }
}
