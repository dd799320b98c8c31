// ABOUTME: Task-list execution engine module
// ABOUTME: Handles list construction, option resolution, sequencing, and fan-out

pub mod context;
pub mod error;
pub mod list;
pub mod options;
pub mod runner;
pub mod summary;

pub use context::ExecutionContext;
pub use error::{ExecutionError, Result};
pub use list::{Invocation, OutputMapper, TaskList, TaskListConfig};
pub use options::{OptionsTemplate, TaskOptions};
pub use runner::TaskRunner;
pub use summary::{HistoryEntry, Summary, SummaryMap, TaskStatus};
