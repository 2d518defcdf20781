use crate::{
    cli::{Args, BuildArgs, Command, TargetArgs},
    core::{
        config::{Properties, PropertyLoader, BUILD_FILE},
        logger::{BackendSinkFactory, EventLogger},
        vcs::{CommandTask, ExportTask, LastRevisionTask, VcsCommandTask},
        DefaultErrorReporter, ErrorReporter, Project, ProjectContext, Task,
    },
    Result,
};

/// Build the project, attach the event logger and run the selected task.
pub fn execute(args: Args) -> Result<bool> {
    let properties = load_properties(&args.build)?;
    let logger = EventLogger::from_properties(
        &properties,
        args.build.level.code(),
        &BackendSinkFactory,
    )?;

    let mut project = Project::new(ProjectContext::with_properties(
        args.build.project.clone(),
        properties,
    ));
    project.add_listener(Box::new(logger));

    let (task, reported_property): (Box<dyn Task>, Option<String>) = match args.command {
        Command::Run(run) => {
            let vcs = vcs_task(&run.target);
            (Box::new(CommandTask::new(vcs, run.mode, run.args)), None)
        }
        Command::LastRevision(last) => {
            let mut task = LastRevisionTask::new(vcs_task(&last.target));
            task.set_property_name(last.property.clone());
            task.set_last_changed(last.last_changed);
            (Box::new(task), Some(last.property))
        }
        Command::Export(export) => {
            let mut task = ExportTask::new(vcs_task(&export.target));
            task.set_to_dir(export.to_dir);
            task.set_force(export.force);
            (Box::new(task), None)
        }
    };

    let mut tasks = vec![task];
    match project.run_build("main", &mut tasks) {
        Ok(()) => {
            if let Some(name) = reported_property {
                if let Some(value) = project.property(&name) {
                    println!("{}={}", name, value);
                }
            }
            Ok(true)
        }
        Err(err) => {
            DefaultErrorReporter::new().report_error(&err);
            Ok(false)
        }
    }
}

fn load_properties(build: &BuildArgs) -> Result<Properties> {
    let mut properties = match &build.property_file {
        Some(path) => {
            let mut loaded = PropertyLoader::load_from_file(path)?;
            if !loaded.contains(BUILD_FILE) {
                loaded.set(BUILD_FILE, path.display().to_string());
            }
            loaded
        }
        None => Properties::new(),
    };
    for definition in &build.define {
        properties.define(definition)?;
    }
    tracing::debug!(count = properties.len(), "build properties loaded");
    Ok(properties)
}

fn vcs_task(target: &TargetArgs) -> VcsCommandTask {
    let mut vcs = VcsCommandTask::new();
    if let Some(working_copy) = &target.working_copy {
        vcs.set_working_copy(working_copy.as_str());
    }
    if let Some(url) = &target.repository_url {
        vcs.set_repository_url(url.as_str());
    }
    vcs.set_executable_path(target.executable.as_str());
    vcs
}
