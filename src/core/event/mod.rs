use crate::core::error::AppError;
use crate::core::project::ProjectContext;
use crate::core::types::Priority;

/// Reference to the task an event originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    name: String,
}

impl TaskRef {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { name: name.into() }
    }

    /// Declared short name of the task, e.g. `svnexport`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Reference to the target an event originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    name: String,
}

impl TargetRef {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Immutable snapshot of one point in a build run's lifecycle.
#[derive(Debug, Clone, Copy)]
pub struct BuildEvent<'a> {
    project: &'a ProjectContext,
    target: Option<&'a TargetRef>,
    task: Option<&'a TaskRef>,
    message: Option<&'a str>,
    priority: Priority,
    exception: Option<&'a AppError>,
}

impl<'a> BuildEvent<'a> {
    pub fn for_project(project: &'a ProjectContext) -> Self {
        Self {
            project,
            target: None,
            task: None,
            message: None,
            priority: Priority::Verbose,
            exception: None,
        }
    }

    pub fn with_target(mut self, target: &'a TargetRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_task(mut self, task: &'a TaskRef) -> Self {
        self.task = Some(task);
        self
    }

    pub fn with_message(mut self, message: &'a str, priority: Priority) -> Self {
        self.message = Some(message);
        self.priority = priority;
        self
    }

    pub fn with_exception(mut self, exception: Option<&'a AppError>) -> Self {
        self.exception = exception;
        self
    }

    pub fn project(&self) -> &'a ProjectContext {
        self.project
    }

    pub fn target(&self) -> Option<&'a TargetRef> {
        self.target
    }

    pub fn task(&self) -> Option<&'a TaskRef> {
        self.task
    }

    pub fn message(&self) -> Option<&'a str> {
        self.message
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn exception(&self) -> Option<&'a AppError> {
        self.exception
    }
}

/// Capability set every build-event subscriber implements.
///
/// The engine calls these sequentially from a single thread. An error returned from a
/// listener is propagated to the engine after the remaining listeners were notified.
pub trait BuildListener {
    fn build_started(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
    fn build_finished(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
    fn target_started(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
    fn target_finished(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
    fn task_started(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
    fn task_finished(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
    fn message_logged(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError>;
}
