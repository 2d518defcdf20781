use keel::core::vcs::{
    ClientFactory, ClientFailure, ClientOptions, ExportTask, FetchMode, LastRevisionTask,
    VcsClient, VcsCommandTask, VcsOutput,
};
use keel::core::{AppError, ErrorCategory, Project, ProjectContext, Task};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Calls = Arc<Mutex<Vec<(String, Vec<String>)>>>;

/// Client double that records every invocation and replays one response.
#[derive(Clone)]
struct ScriptedFactory {
    calls: Calls,
    options: Arc<Mutex<Vec<ClientOptions>>>,
    response: Result<VcsOutput, ClientFailure>,
}

impl ScriptedFactory {
    fn new(response: Result<VcsOutput, ClientFailure>) -> Self {
        Self {
            calls: Calls::default(),
            options: Arc::default(),
            response,
        }
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

struct ScriptedClient {
    mode: String,
    calls: Calls,
    response: Result<VcsOutput, ClientFailure>,
}

impl VcsClient for ScriptedClient {
    fn run(&mut self, args: &[String]) -> Result<VcsOutput, ClientFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((self.mode.clone(), args.to_vec()));
        self.response.clone()
    }
}

impl ClientFactory for ScriptedFactory {
    fn is_available(&self, _options: &ClientOptions) -> bool {
        true
    }

    fn create(&self, mode: &str, options: ClientOptions) -> Result<Box<dyn VcsClient>, AppError> {
        self.options.lock().unwrap().push(options);
        Ok(Box::new(ScriptedClient {
            mode: mode.to_string(),
            calls: self.calls.clone(),
            response: self.response.clone(),
        }))
    }
}

fn ok_output(stdout: &str) -> Result<VcsOutput, ClientFailure> {
    Ok(VcsOutput {
        stdout: stdout.to_string(),
        records: keel::core::vcs::parse_records(stdout),
    })
}

fn working_copy(with_metadata: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    if with_metadata {
        std::fs::create_dir(dir.path().join(".svn")).unwrap();
    }
    dir
}

#[test]
fn setters_round_trip() {
    let mut task = VcsCommandTask::new();
    task.set_working_copy("/tmp/wc");
    task.set_repository_url("http://svn.example.org/repo");
    task.set_executable_path("/usr/local/bin/svn");

    assert_eq!(task.working_copy(), "/tmp/wc");
    assert_eq!(task.repository_url(), "http://svn.example.org/repo");
    assert_eq!(task.executable_path(), "/usr/local/bin/svn");
}

#[test]
fn repository_url_wins_over_working_copy() {
    let factory = ScriptedFactory::new(ok_output(""));
    let mut task = VcsCommandTask::with_factory(Box::new(factory));
    task.set_repository_url("http://x");
    task.set_working_copy("/tmp/wc");

    task.setup("info").unwrap();

    assert_eq!(task.base_args(), ["http://x".to_string()]);
    assert_eq!(task.mode(), "info");
}

#[test]
fn setup_passes_associative_options_to_client() {
    let factory = ScriptedFactory::new(ok_output(""));
    let mut task = VcsCommandTask::with_factory(Box::new(factory.clone()));
    task.set_executable_path("/opt/svn/bin/svn");

    task.setup("info").unwrap();

    let options = factory.options.lock().unwrap();
    assert_eq!(
        options.as_slice(),
        &[ClientOptions {
            fetch_mode: FetchMode::Associative,
            executable_path: "/opt/svn/bin/svn".to_string(),
        }]
    );
}

#[test]
fn directory_without_metadata_is_not_a_working_copy() {
    let dir = working_copy(false);
    let mut task = VcsCommandTask::with_factory(Box::new(ScriptedFactory::new(ok_output(""))));
    task.set_working_copy(dir.path().to_string_lossy());

    let err = task.setup("info").unwrap_err();

    assert_eq!(err.category, ErrorCategory::NotAWorkingCopy);
    assert!(err.message.contains("doesn't seem to be a working copy"));
    assert!(task.base_args().is_empty());
}

#[test]
fn missing_directory_is_an_invalid_working_copy() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");
    let mut task = VcsCommandTask::with_factory(Box::new(ScriptedFactory::new(ok_output(""))));
    task.set_working_copy(missing.to_string_lossy());

    let err = task.setup("info").unwrap_err();
    assert_eq!(err.category, ErrorCategory::InvalidWorkingCopy);
}

#[test]
fn valid_working_copy_becomes_the_base_argument() {
    let dir = working_copy(true);
    let path = dir.path().to_string_lossy().to_string();
    let mut task = VcsCommandTask::with_factory(Box::new(ScriptedFactory::new(ok_output(""))));
    task.set_working_copy(path.clone());

    task.setup("status").unwrap();
    assert_eq!(task.base_args(), [path]);
}

#[test]
fn no_target_leaves_base_args_empty() {
    let factory = ScriptedFactory::new(ok_output("ok"));
    let mut task = VcsCommandTask::with_factory(Box::new(factory.clone()));

    task.setup("list").unwrap();
    let output = task.run(None).unwrap();

    assert!(task.base_args().is_empty());
    assert_eq!(output.stdout, "ok");
    assert_eq!(factory.calls(), vec![("list".to_string(), vec![])]);
}

#[test]
fn run_appends_extra_args_after_base_args() {
    let dir = working_copy(true);
    let path = dir.path().to_string_lossy().to_string();
    let factory = ScriptedFactory::new(ok_output("Revision: 5\n"));
    let mut task = VcsCommandTask::with_factory(Box::new(factory.clone()));
    task.set_working_copy(path.clone());

    task.setup("log").unwrap();
    let output = task
        .run(Some(&["info".to_string(), "--limit".to_string()]))
        .unwrap();

    assert_eq!(output.field("Revision"), Some("5"));
    assert_eq!(
        factory.calls(),
        vec![(
            "log".to_string(),
            vec![path, "info".to_string(), "--limit".to_string()]
        )]
    );
}

#[test]
fn failure_with_message_becomes_command_error() {
    let factory = ScriptedFactory::new(Err(ClientFailure::with_message(
        "E170000: URL doesn't exist",
    )));
    let mut task = VcsCommandTask::with_factory(Box::new(factory));
    task.set_repository_url("http://x");

    task.setup("info").unwrap();
    let err = task.run(None).unwrap_err();

    assert_eq!(err.category, ErrorCategory::VcsCommandError);
    assert_eq!(
        err.message,
        "Failed to run the 'svn info' command: E170000: URL doesn't exist"
    );
}

#[test]
fn failure_without_message_is_reported_as_unknown() {
    let factory = ScriptedFactory::new(Err(ClientFailure::unknown()));
    let mut task = VcsCommandTask::with_factory(Box::new(factory));

    task.setup("update").unwrap();
    let err = task.run(None).unwrap_err();

    assert_eq!(err.category, ErrorCategory::UnknownCommandFailure);
    assert!(err.message.starts_with("Failed to run the 'svn update' command"));
}

#[test]
fn setup_again_creates_a_fresh_client() {
    let factory = ScriptedFactory::new(ok_output(""));
    let mut task = VcsCommandTask::with_factory(Box::new(factory.clone()));

    task.setup("info").unwrap();
    task.run(None).unwrap();
    task.setup("status").unwrap();
    task.run(None).unwrap();

    let modes: Vec<String> = factory.calls().into_iter().map(|(mode, _)| mode).collect();
    assert_eq!(modes, vec!["info", "status"]);
    assert_eq!(factory.options.lock().unwrap().len(), 2);
}

#[test]
fn last_revision_task_sets_property() {
    let factory = ScriptedFactory::new(ok_output(
        "Path: trunk\nRevision: 1042\nLast Changed Rev: 1040\n",
    ));
    let mut vcs = VcsCommandTask::with_factory(Box::new(factory.clone()));
    vcs.set_repository_url("http://svn.example.org/repo/trunk");
    let mut task = LastRevisionTask::new(vcs);
    let mut project = Project::new(ProjectContext::new("demo"));

    task.init().unwrap();
    task.main(&mut project).unwrap();
    assert_eq!(project.property("svn.lastrevision"), Some("1042"));

    task.set_property_name("changed");
    task.set_last_changed(true);
    task.main(&mut project).unwrap();
    assert_eq!(project.property("changed"), Some("1040"));
}

#[test]
fn last_revision_task_fails_without_revision_field() {
    let factory = ScriptedFactory::new(ok_output("Path: trunk\n"));
    let mut task = LastRevisionTask::new(VcsCommandTask::with_factory(Box::new(factory)));
    let mut project = Project::new(ProjectContext::new("demo"));

    let err = task.main(&mut project).unwrap_err();
    assert_eq!(err.category, ErrorCategory::VcsCommandError);
    assert!(project.property("svn.lastrevision").is_none());
}

#[test]
fn export_task_passes_destination_and_force() {
    let factory = ScriptedFactory::new(ok_output("A    dist/readme.txt\nExported revision 7.\n"));
    let mut vcs = VcsCommandTask::with_factory(Box::new(factory.clone()));
    vcs.set_repository_url("http://x");
    let mut task = ExportTask::new(vcs);
    task.set_to_dir("dist");
    task.set_force(true);
    let mut project = Project::new(ProjectContext::new("demo"));

    task.main(&mut project).unwrap();

    assert_eq!(
        factory.calls(),
        vec![(
            "export".to_string(),
            vec![
                "http://x".to_string(),
                "dist".to_string(),
                "--force".to_string()
            ]
        )]
    );
}

#[test]
fn export_task_requires_destination() {
    let factory = ScriptedFactory::new(ok_output(""));
    let mut task = ExportTask::new(VcsCommandTask::with_factory(Box::new(factory.clone())));
    let mut project = Project::new(ProjectContext::new("demo"));

    let err = task.main(&mut project).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ValidationError);
    assert!(factory.calls().is_empty());
}
