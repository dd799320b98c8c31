// ABOUTME: Task list construction, composition, and the run entry point
// ABOUTME: Holds ordered invocations with option templates and output mappers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::context::ExecutionContext;
use super::options::OptionsTemplate;
use super::runner::TaskRunner;
use super::summary::SummaryMap;
use crate::registry::{TaskOutput, TaskRegistry};
use crate::session::SessionRef;

/// Marker appended to a list's name by [`TaskList::concat`] to signal a
/// composed/derived list.
const COMPOSED_MARKER: &str = "+";

/// Caller-supplied function copying a task's output values into the
/// execution context for use by later invocations in the same pipeline.
pub type OutputMapper =
    Arc<dyn Fn(&mut ExecutionContext, &TaskOutput) -> anyhow::Result<()> + Send + Sync>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListConfig {
    /// Continue past task failures within a session; failed entries are
    /// still recorded, but no terminal error is set for them.
    #[serde(default)]
    pub ignore_errors: bool,

    /// Reporting hint for result formatting. No effect on execution.
    #[serde(default)]
    pub pretty: bool,
}

/// One concrete, ordered use of a task type within a list.
#[derive(Clone)]
pub struct Invocation {
    pub task_type: String,
    pub display_name: String,
    pub options: OptionsTemplate,
    pub output_mapper: Option<OutputMapper>,
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("task_type", &self.task_type)
            .field("display_name", &self.display_name)
            .field("options", &self.options)
            .field("has_output_mapper", &self.output_mapper.is_some())
            .finish()
    }
}

/// Named, ordered sequence of invocations. Append-only during
/// construction; execution order is exactly declaration order.
#[derive(Debug, Clone)]
pub struct TaskList {
    name: String,
    config: TaskListConfig,
    invocations: Vec<Invocation>,
}

impl TaskList {
    pub fn new(name: impl Into<String>, config: TaskListConfig) -> Self {
        Self {
            name: name.into(),
            config,
            invocations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TaskListConfig {
        &self.config
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    /// Append an invocation of `task_type`. The type is only looked up
    /// in the registry at dispatch time, so appending before the type
    /// is registered is fine as long as registration happens before the
    /// list runs.
    pub fn append(
        &mut self,
        task_type: impl Into<String>,
        display_name: impl Into<String>,
        options: OptionsTemplate,
    ) -> &mut Self {
        self.invocations.push(Invocation {
            task_type: task_type.into(),
            display_name: display_name.into(),
            options,
            output_mapper: None,
        });
        self
    }

    /// Append an invocation with an output mapper that copies the
    /// task's outputs into the execution context.
    pub fn append_mapped<M>(
        &mut self,
        task_type: impl Into<String>,
        display_name: impl Into<String>,
        options: OptionsTemplate,
        mapper: M,
    ) -> &mut Self
    where
        M: Fn(&mut ExecutionContext, &TaskOutput) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.invocations.push(Invocation {
            task_type: task_type.into(),
            display_name: display_name.into(),
            options,
            output_mapper: Some(Arc::new(mapper)),
        });
        self
    }

    /// Build a new list holding this list's invocations followed by
    /// each of `others`' invocations, in argument order. The new list
    /// inherits the receiver's configuration and takes the receiver's
    /// name with a trailing marker. No input list is mutated.
    pub fn concat(&self, others: &[&TaskList]) -> TaskList {
        let mut invocations = self.invocations.clone();
        for other in others {
            invocations.extend(other.invocations.iter().cloned());
        }

        TaskList {
            name: format!("{}{}", self.name, COMPOSED_MARKER),
            config: self.config.clone(),
            invocations,
        }
    }

    /// Execute this list against the given sessions, one independent
    /// pipeline per session. Resolves to the per-session summary map.
    pub async fn run(&self, registry: Arc<TaskRegistry>, sessions: &[SessionRef]) -> SummaryMap {
        TaskRunner::new(registry).run(self, sessions).await
    }
}
