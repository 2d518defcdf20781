pub mod config;
pub mod error;
pub mod event;
pub mod logger;
pub mod project;
pub mod types;
pub mod vcs;

pub use config::{Properties, PropertyLoader};
pub use error::{AppError, DefaultErrorReporter, ErrorReporter};
pub use event::{BuildEvent, BuildListener, TargetRef, TaskRef};
pub use logger::{BackendSinkFactory, EventLogger, Sink, SinkConfigurator, SinkFactory};
pub use project::{Project, ProjectContext, Task};
pub use types::*;
pub use vcs::{VcsClient, VcsCommandTask, VcsOutput};
