//! Text formatting for build log lines.

/// Width of the task-name column preceding task messages.
pub const LEFT_COLUMN_SIZE: usize = 12;

/// `"[name] "` left-padded with spaces to `width`. Longer names are kept whole.
pub fn task_prefix(task_name: &str, width: usize) -> String {
    let label = format!("[{}] ", task_name);
    format!("{:>width$}", label, width = width)
}

/// Elapsed build time as reported in the build-finished line, in milliseconds.
pub fn format_elapsed(elapsed_millis: i64) -> String {
    elapsed_millis.max(0).to_string()
}

/// Line written when the build ends. `failure` carries the failure reason.
pub fn build_finished_message(failure: Option<&str>, elapsed_millis: i64) -> String {
    let status = match failure {
        None => "Finished successful build.".to_string(),
        Some(reason) => format!("Build failed. [reason: {}]", reason),
    };
    format!("{} Total time: {}", status, format_elapsed(elapsed_millis))
}
