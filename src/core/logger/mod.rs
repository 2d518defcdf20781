//! Build listener that renders lifecycle events to a log sink.
//!
//! Messages pass the filter when their priority code is less than or equal to the configured
//! output level, so a higher level lets more verbose messages through. The sink is supplied at
//! construction, either directly or through a [`SinkFactory`] driven by build properties.

#![allow(clippy::result_large_err)]

pub mod backends;
pub mod format;
pub mod sink;

pub use backends::{BackendSinkFactory, ConsoleSink, FileSink, NullSink};
pub use format::{build_finished_message, task_prefix, LEFT_COLUMN_SIZE};
pub use sink::{Sink, SinkConfigurator, SinkError, SinkFactory, SinkSettings};

use crate::core::config::{Properties, BUILD_FILE};
use crate::core::error::AppError;
use crate::core::event::{BuildEvent, BuildListener};
use crate::core::types::{Priority, SinkSeverity};

/// Source of wall-clock milliseconds.
pub trait Clock: Send {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

pub struct EventLogger {
    output_level: i32,
    start_time_millis: i64,
    sink: Box<dyn Sink>,
    clock: Box<dyn Clock>,
}

impl EventLogger {
    /// Wrap an already constructed sink. The output level starts at DEBUG.
    pub fn new(sink: Box<dyn Sink>) -> Self {
        Self {
            output_level: Priority::Debug.code(),
            start_time_millis: 0,
            sink,
            clock: Box::new(SystemClock),
        }
    }

    /// Build the sink from `properties` through `factory`, once, at `output_level`.
    pub fn from_properties(
        properties: &Properties,
        output_level: i32,
        factory: &dyn SinkFactory,
    ) -> Result<Self, AppError> {
        let sink = SinkConfigurator::configure(properties, output_level, factory)?;
        let mut logger = Self::new(sink);
        logger.output_level = output_level;
        Ok(logger)
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the verbosity threshold. Any value is accepted as-is.
    pub fn set_output_level(&mut self, level: i32) {
        self.output_level = level;
        self.sink
            .set_threshold(Priority::clamp_code(level).sink_severity());
    }

    pub fn output_level(&self) -> i32 {
        self.output_level
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    fn write(&mut self, message: &str, severity: SinkSeverity) -> Result<(), AppError> {
        self.sink.log(message, severity).map_err(AppError::from)
    }
}

impl BuildListener for EventLogger {
    fn build_started(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError> {
        self.start_time_millis = self.clock.now_millis();
        let project = event.project();
        self.sink.set_ident(project.name());
        let build_file = project.property(BUILD_FILE).unwrap_or_default();
        self.write(
            &format!("Starting build with buildfile: {}", build_file),
            SinkSeverity::Info,
        )
    }

    fn build_finished(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError> {
        let elapsed = self.clock.now_millis() - self.start_time_millis;
        let failure = event.exception().map(|err| err.message.as_str());
        let message = build_finished_message(failure, elapsed);
        // The build result is never masked by the output level.
        self.sink
            .log_unfiltered(&message, SinkSeverity::Info)
            .map_err(AppError::from)
    }

    fn target_started(&mut self, _event: &BuildEvent<'_>) -> Result<(), AppError> {
        Ok(())
    }

    fn target_finished(&mut self, _event: &BuildEvent<'_>) -> Result<(), AppError> {
        Ok(())
    }

    fn task_started(&mut self, _event: &BuildEvent<'_>) -> Result<(), AppError> {
        Ok(())
    }

    fn task_finished(&mut self, _event: &BuildEvent<'_>) -> Result<(), AppError> {
        Ok(())
    }

    fn message_logged(&mut self, event: &BuildEvent<'_>) -> Result<(), AppError> {
        let priority = event.priority();
        if priority.code() > self.output_level {
            return Ok(());
        }
        let mut line = match event.task() {
            Some(task) => task_prefix(task.name(), LEFT_COLUMN_SIZE),
            None => String::new(),
        };
        line.push_str(event.message().unwrap_or_default());
        self.write(&line, priority.sink_severity())
    }
}
