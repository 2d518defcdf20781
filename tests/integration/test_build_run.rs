use keel::core::config::{Properties, BUILD_FILE, SINK_CONF, SINK_NAME, SINK_TYPE};
use keel::core::logger::{BackendSinkFactory, EventLogger};
use keel::core::{AppError, ErrorCategory, Priority, Project, ProjectContext, Task};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct EchoTask {
    lines: Vec<(&'static str, Priority)>,
}

impl Task for EchoTask {
    fn name(&self) -> &str {
        "echo"
    }

    fn main(&mut self, project: &mut Project) -> Result<(), AppError> {
        for (line, priority) in &self.lines {
            project.log_task(self.name(), line, *priority)?;
        }
        Ok(())
    }
}

struct FailingTask;

impl Task for FailingTask {
    fn name(&self) -> &str {
        "svnexport"
    }

    fn main(&mut self, _project: &mut Project) -> Result<(), AppError> {
        Err(AppError::new(
            ErrorCategory::VcsCommandError,
            "Failed to run the 'svn export' command: E155007",
        ))
    }
}

fn file_sink_properties(log: &Path) -> Properties {
    let mut props = Properties::new();
    props.set(BUILD_FILE, "build.toml");
    props.set(SINK_TYPE, "file");
    props.set(SINK_NAME, log.display().to_string());
    props.set(SINK_CONF, "append=false,timeFormat=%Y");
    props
}

fn project_with_logger(props: Properties, level: Priority) -> Project {
    let logger = EventLogger::from_properties(&props, level.code(), &BackendSinkFactory)
        .expect("file sink should open");
    let mut project = Project::new(ProjectContext::with_properties("website", props));
    project.add_listener(Box::new(logger));
    project
}

fn log_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("failed to read build log")
        .lines()
        .map(|line| line.split_once(' ').map(|(_, rest)| rest).unwrap_or(line).to_string())
        .collect()
}

#[test]
fn successful_build_is_written_to_file_sink() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("logs").join("build.log");
    let mut project = project_with_logger(file_sink_properties(&log), Priority::Info);

    let mut tasks: Vec<Box<dyn Task>> = vec![Box::new(EchoTask {
        lines: vec![
            ("copying 3 files", Priority::Info),
            ("copied readme.txt", Priority::Verbose),
            ("disk nearly full", Priority::Warning),
        ],
    })];
    project.run_build("main", &mut tasks).unwrap();
    drop(project);

    let lines = log_lines(&log);
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert_eq!(lines[0], "website [info] Starting build with buildfile: build.toml");
    assert_eq!(lines[1], "website [info]      [echo] copying 3 files");
    assert_eq!(lines[2], "website [warning]      [echo] disk nearly full");
    assert!(lines[3].starts_with("website [info] Finished successful build. Total time: "));
}

#[test]
fn failed_build_reports_reason_and_stops() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("build.log");
    let mut project = project_with_logger(file_sink_properties(&log), Priority::Debug);

    let mut tasks: Vec<Box<dyn Task>> = vec![
        Box::new(FailingTask),
        Box::new(EchoTask {
            lines: vec![("never runs", Priority::Error)],
        }),
    ];
    let err = project.run_build("main", &mut tasks).unwrap_err();
    drop(project);

    assert_eq!(err.category, ErrorCategory::VcsCommandError);
    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains(
        "Build failed. [reason: Failed to run the 'svn export' command: E155007] Total time: "
    ));
    assert!(!contents.contains("never runs"));
}

#[test]
fn error_threshold_still_records_build_result() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("build.log");
    let mut project = project_with_logger(file_sink_properties(&log), Priority::Error);

    let mut tasks: Vec<Box<dyn Task>> = vec![Box::new(EchoTask {
        lines: vec![("noise", Priority::Info), ("broken", Priority::Error)],
    })];
    project.run_build("main", &mut tasks).unwrap();
    drop(project);

    let lines = log_lines(&log);
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert_eq!(lines[0], "website [error]      [echo] broken");
    assert!(lines[1].starts_with("website [info] Finished successful build."));
}

#[test]
fn append_option_keeps_previous_runs() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("build.log");
    let mut props = file_sink_properties(&log);
    props.set(SINK_CONF, "append=true");

    for _ in 0..2 {
        let mut project = project_with_logger(props.clone(), Priority::Info);
        project.run_build("main", &mut []).unwrap();
    }

    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.matches("Starting build with buildfile").count(), 2);
}

#[test]
fn listener_logfile_is_used_when_sink_name_is_absent() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("listener.log");
    let mut props = Properties::new();
    props.set("listener.logfile", log.display().to_string());

    let mut project = project_with_logger(props, Priority::Info);
    project.log("hello from the project", Priority::Info).unwrap();
    drop(project);

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("phing [info] hello from the project"));
}
