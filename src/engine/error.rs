// ABOUTME: Error types for task-list execution
// ABOUTME: Distinguishes operational task failures from setup and pipeline faults

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A task handler resolved with an error. Terminal for the session
    /// unless the list runs with `ignore_errors`.
    #[error("task failed: {task} - {message}")]
    TaskFailed { task: String, message: String },

    /// An invocation references a task type that was never registered.
    /// A setup bug, not an operational failure; aborts the pipeline.
    #[error("unknown task type: {task_type}")]
    UnknownTaskType { task_type: String },

    /// An output mapper failed while writing into the execution
    /// context. Fatal for the pipeline regardless of `ignore_errors`.
    #[error("output mapper failed for task {task}: {message}")]
    OutputMapperFailed { task: String, message: String },

    /// The session's pipeline task died before producing a summary.
    #[error("session pipeline aborted for {host}: {message}")]
    PipelineAborted { host: String, message: String },
}

impl ExecutionError {
    /// True for errors that indicate a configuration/programming bug
    /// rather than a failure of the work itself.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, ExecutionError::UnknownTaskType { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
