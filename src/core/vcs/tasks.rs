#![allow(clippy::result_large_err)]

use super::VcsCommandTask;
use crate::core::error::AppError;
use crate::core::project::{Project, Task};
use crate::core::types::{ErrorCategory, Priority};

pub const DEFAULT_REVISION_PROPERTY: &str = "svn.lastrevision";

/// Stores the revision of a working copy or repository in a project property.
pub struct LastRevisionTask {
    vcs: VcsCommandTask,
    property_name: String,
    last_changed: bool,
}

impl LastRevisionTask {
    pub fn new(vcs: VcsCommandTask) -> Self {
        Self {
            vcs,
            property_name: DEFAULT_REVISION_PROPERTY.to_string(),
            last_changed: false,
        }
    }

    pub fn set_property_name<T: Into<String>>(&mut self, name: T) {
        self.property_name = name.into();
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Report the last changed revision instead of the current one.
    pub fn set_last_changed(&mut self, last_changed: bool) {
        self.last_changed = last_changed;
    }

    pub fn vcs(&self) -> &VcsCommandTask {
        &self.vcs
    }
}

impl Task for LastRevisionTask {
    fn name(&self) -> &str {
        "svnlastrevision"
    }

    fn init(&mut self) -> Result<(), AppError> {
        self.vcs.init()
    }

    fn main(&mut self, project: &mut Project) -> Result<(), AppError> {
        self.vcs.setup("info")?;
        let output = self.vcs.run(None)?;

        let field = if self.last_changed {
            "Last Changed Rev"
        } else {
            "Revision"
        };
        let revision = output.field(field).ok_or_else(|| {
            AppError::new(
                ErrorCategory::VcsCommandError,
                format!(
                    "Failed to read '{}' from the '{} info' output",
                    field,
                    self.vcs.vcs_binary()
                ),
            )
        })?;

        project.set_property(self.property_name.as_str(), revision);
        project.log_task(
            self.name(),
            &format!("{} = {}", self.property_name, revision),
            Priority::Verbose,
        )
    }
}

/// Exports a clean directory tree from the repository or working copy.
pub struct ExportTask {
    vcs: VcsCommandTask,
    to_dir: Option<String>,
    force: bool,
}

impl ExportTask {
    pub fn new(vcs: VcsCommandTask) -> Self {
        Self {
            vcs,
            to_dir: None,
            force: false,
        }
    }

    pub fn set_to_dir<T: Into<String>>(&mut self, to_dir: T) {
        self.to_dir = Some(to_dir.into());
    }

    pub fn to_dir(&self) -> Option<&str> {
        self.to_dir.as_deref()
    }

    /// Overwrite files that already exist in the destination.
    pub fn set_force(&mut self, force: bool) {
        self.force = force;
    }
}

impl Task for ExportTask {
    fn name(&self) -> &str {
        "svnexport"
    }

    fn init(&mut self) -> Result<(), AppError> {
        self.vcs.init()
    }

    fn main(&mut self, project: &mut Project) -> Result<(), AppError> {
        let to_dir = self.to_dir.clone().ok_or_else(|| {
            AppError::new(
                ErrorCategory::ValidationError,
                "The svnexport task requires a destination directory",
            )
        })?;

        project.log_task(
            self.name(),
            &format!("Exporting SVN repository to '{}'", to_dir),
            Priority::Info,
        )?;

        self.vcs.setup("export")?;
        let mut args = vec![to_dir];
        if self.force {
            args.push("--force".to_string());
        }
        let output = self.vcs.run(Some(&args))?;

        for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
            project.log_task(self.name(), line, Priority::Verbose)?;
        }
        Ok(())
    }
}

/// Runs an arbitrary mode and logs each output line.
pub struct CommandTask {
    vcs: VcsCommandTask,
    mode: String,
    args: Vec<String>,
}

impl CommandTask {
    pub fn new<T: Into<String>>(vcs: VcsCommandTask, mode: T, args: Vec<String>) -> Self {
        Self {
            vcs,
            mode: mode.into(),
            args,
        }
    }
}

impl Task for CommandTask {
    fn name(&self) -> &str {
        "svn"
    }

    fn init(&mut self) -> Result<(), AppError> {
        self.vcs.init()
    }

    fn main(&mut self, project: &mut Project) -> Result<(), AppError> {
        self.vcs.setup(&self.mode)?;
        let extra = (!self.args.is_empty()).then_some(self.args.as_slice());
        let output = self.vcs.run(extra)?;

        for line in output.stdout.lines() {
            project.log_task(self.name(), line, Priority::Info)?;
        }
        Ok(())
    }
}
