#![allow(clippy::result_large_err)]

use crate::core::config::Properties;
use crate::core::error::AppError;
use crate::core::event::{BuildEvent, BuildListener, TargetRef, TaskRef};
use crate::core::types::Priority;

/// Project name and properties as seen by listeners and tasks.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    name: String,
    properties: Properties,
}

impl ProjectContext {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_properties<T: Into<String>>(name: T, properties: Properties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// A unit of build work.
pub trait Task {
    /// Declared short name used in log prefixes.
    fn name(&self) -> &str;

    /// Checks run before the task executes, e.g. that external tools are present.
    fn init(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    fn main(&mut self, project: &mut Project) -> Result<(), AppError>;
}

/// Minimal build driver: holds the project state and fans lifecycle events out to listeners.
pub struct Project {
    context: ProjectContext,
    listeners: Vec<Box<dyn BuildListener>>,
}

impl Project {
    pub fn new(context: ProjectContext) -> Self {
        Self {
            context,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn BuildListener>) {
        self.listeners.push(listener);
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    pub fn name(&self) -> &str {
        self.context.name()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.context.property(key)
    }

    pub fn set_property<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.context.properties.set(key, value);
    }

    pub fn fire_build_started(&mut self) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context);
        notify(&mut self.listeners, &event, |l, e| l.build_started(e))
    }

    pub fn fire_build_finished(&mut self, error: Option<&AppError>) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context).with_exception(error);
        notify(&mut self.listeners, &event, |l, e| l.build_finished(e))
    }

    pub fn fire_target_started(&mut self, target: &TargetRef) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context).with_target(target);
        notify(&mut self.listeners, &event, |l, e| l.target_started(e))
    }

    pub fn fire_target_finished(
        &mut self,
        target: &TargetRef,
        error: Option<&AppError>,
    ) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context)
            .with_target(target)
            .with_exception(error);
        notify(&mut self.listeners, &event, |l, e| l.target_finished(e))
    }

    pub fn fire_task_started(&mut self, task: &TaskRef) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context).with_task(task);
        notify(&mut self.listeners, &event, |l, e| l.task_started(e))
    }

    pub fn fire_task_finished(
        &mut self,
        task: &TaskRef,
        error: Option<&AppError>,
    ) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context)
            .with_task(task)
            .with_exception(error);
        notify(&mut self.listeners, &event, |l, e| l.task_finished(e))
    }

    /// Log a project-level message.
    pub fn log(&mut self, message: &str, priority: Priority) -> Result<(), AppError> {
        let event = BuildEvent::for_project(&self.context).with_message(message, priority);
        notify(&mut self.listeners, &event, |l, e| l.message_logged(e))
    }

    /// Log a message on behalf of the named task.
    pub fn log_task(
        &mut self,
        task_name: &str,
        message: &str,
        priority: Priority,
    ) -> Result<(), AppError> {
        let task = TaskRef::new(task_name);
        let event = BuildEvent::for_project(&self.context)
            .with_task(&task)
            .with_message(message, priority);
        notify(&mut self.listeners, &event, |l, e| l.message_logged(e))
    }

    /// Run `tasks` in order under a single target, wrapped in build start/finish events.
    ///
    /// The first failing task stops the target. Its error is reported through
    /// `build_finished` and returned. A listener failing at build start skips the target but
    /// still gets the build-finished notification.
    pub fn run_build(&mut self, target: &str, tasks: &mut [Box<dyn Task>]) -> Result<(), AppError> {
        let outcome = self.fire_build_started().and_then(|_| {
            let target = TargetRef::new(target);
            self.run_target(&target, tasks)
        });
        let finished = self.fire_build_finished(outcome.as_ref().err());
        outcome.and(finished)
    }

    fn run_target(&mut self, target: &TargetRef, tasks: &mut [Box<dyn Task>]) -> Result<(), AppError> {
        self.fire_target_started(target)?;
        let mut outcome = Ok(());
        for task in tasks.iter_mut() {
            outcome = self.run_task(task.as_mut());
            if outcome.is_err() {
                break;
            }
        }
        let finished = self.fire_target_finished(target, outcome.as_ref().err());
        outcome.and(finished)
    }

    fn run_task(&mut self, task: &mut dyn Task) -> Result<(), AppError> {
        let task_ref = TaskRef::new(task.name());
        self.fire_task_started(&task_ref)?;
        tracing::debug!(task = task_ref.name(), "executing task");
        let outcome = task.init().and_then(|_| task.main(self));
        let finished = self.fire_task_finished(&task_ref, outcome.as_ref().err());
        outcome.and(finished)
    }
}

fn notify<F>(
    listeners: &mut [Box<dyn BuildListener>],
    event: &BuildEvent<'_>,
    mut deliver: F,
) -> Result<(), AppError>
where
    F: FnMut(&mut dyn BuildListener, &BuildEvent<'_>) -> Result<(), AppError>,
{
    let mut first_error = None;
    for listener in listeners.iter_mut() {
        if let Err(err) = deliver(listener.as_mut(), event) {
            tracing::warn!(error = %err, "build listener failed");
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
