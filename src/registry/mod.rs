// ABOUTME: Task handler registration and lookup
// ABOUTME: Maps task-type names to executable handlers for runner dispatch

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::future::Future;

use crate::engine::options::TaskOptions;
use crate::session::SessionRef;

/// Opaque output values a task hands back on success, fed to the
/// invocation's output mapper (e.g. a command task's stdout and stderr).
pub type TaskOutput = Vec<serde_json::Value>;

/// A registered unit of work logic, reusable across many invocations.
///
/// A handler resolves exactly once per invocation: `Ok` with its output
/// values, or `Err` with the failure recorded into the session history.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn execute(
        &self,
        session: SessionRef,
        options: TaskOptions,
    ) -> anyhow::Result<TaskOutput>;

    fn task_type(&self) -> &str;
}

type BoxedTaskFn =
    Box<dyn Fn(SessionRef, TaskOptions) -> BoxFuture<'static, anyhow::Result<TaskOutput>> + Send + Sync>;

/// Adapter turning an async closure into a [`TaskHandler`].
struct FnHandler {
    task_type: String,
    handler: BoxedTaskFn,
}

#[async_trait]
impl TaskHandler for FnHandler {
    async fn execute(
        &self,
        session: SessionRef,
        options: TaskOptions,
    ) -> anyhow::Result<TaskOutput> {
        (self.handler)(session, options).await
    }

    fn task_type(&self) -> &str {
        &self.task_type
    }
}

/// Registry of task handlers keyed by task-type name.
///
/// Registration is a setup-time operation: populate the registry before
/// any run starts, then share it read-only (typically behind `Arc`)
/// with every runner that dispatches through it.
pub struct TaskRegistry {
    handlers: HashMap<String, Box<dyn TaskHandler>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Store a handler under its task-type name, overwriting any prior
    /// registration for that name.
    pub fn register(&mut self, handler: Box<dyn TaskHandler>) {
        let task_type = handler.task_type().to_string();
        self.handlers.insert(task_type, handler);
    }

    /// Register an async closure as a handler for `task_type`.
    pub fn register_fn<F, Fut>(&mut self, task_type: impl Into<String>, handler: F)
    where
        F: Fn(SessionRef, TaskOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<TaskOutput>> + Send + 'static,
    {
        let handler: BoxedTaskFn =
            Box::new(move |session, options| handler(session, options).boxed());
        self.register(Box::new(FnHandler {
            task_type: task_type.into(),
            handler,
        }));
    }

    pub fn resolve(&self, task_type: &str) -> Option<&dyn TaskHandler> {
        self.handlers.get(task_type).map(|handler| handler.as_ref())
    }

    pub fn contains(&self, task_type: &str) -> bool {
        self.handlers.contains_key(task_type)
    }

    pub fn task_types(&self) -> Vec<&str> {
        self.handlers.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
