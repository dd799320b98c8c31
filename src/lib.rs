// ABOUTME: Main library module for the convoy task-list execution engine
// ABOUTME: Exports all core modules and provides the public API

pub mod engine;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use engine::{
    ExecutionContext, ExecutionError, HistoryEntry, Invocation, OptionsTemplate, Summary,
    SummaryMap, TaskList, TaskListConfig, TaskOptions, TaskRunner, TaskStatus,
};
pub use registry::{TaskHandler, TaskOutput, TaskRegistry};
pub use session::{HostSession, Session, SessionRef};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
