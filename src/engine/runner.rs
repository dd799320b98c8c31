// ABOUTME: Runner driving task lists across sessions
// ABOUTME: Fans out one sequential pipeline per session and aggregates summaries

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use super::context::ExecutionContext;
use super::error::{ExecutionError, Result};
use super::list::TaskList;
use super::summary::{HistoryEntry, Summary, SummaryMap};
use crate::registry::TaskRegistry;
use crate::session::SessionRef;

/// Executes a task list against one or more sessions.
///
/// Sessions run as independent concurrent pipelines; within one session
/// execution is strictly sequential, each task await being the sole
/// suspension point.
pub struct TaskRunner {
    registry: Arc<TaskRegistry>,
    max_concurrent_sessions: Option<usize>,
}

impl TaskRunner {
    pub fn new(registry: Arc<TaskRegistry>) -> Self {
        Self {
            registry,
            max_concurrent_sessions: None,
        }
    }

    /// Bound the number of session pipelines running at once.
    /// Unbounded by default.
    pub fn with_max_concurrent_sessions(mut self, max: usize) -> Self {
        self.max_concurrent_sessions = Some(max);
        self
    }

    /// Pre-flight check that every invocation's task type is
    /// registered, without executing anything.
    pub fn validate(&self, list: &TaskList) -> Result<()> {
        for invocation in list.invocations() {
            if !self.registry.contains(&invocation.task_type) {
                return Err(ExecutionError::UnknownTaskType {
                    task_type: invocation.task_type.clone(),
                });
            }
        }
        Ok(())
    }

    /// Run `list` against every session and collect one summary per
    /// session, keyed by host identity in the order supplied.
    #[instrument(skip(self, list, sessions), fields(list_name = %list.name()))]
    pub async fn run(&self, list: &TaskList, sessions: &[SessionRef]) -> SummaryMap {
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Starting task list run: {} across {} sessions (run_id: {})",
            list.name(),
            sessions.len(),
            run_id
        );

        let semaphore = self
            .max_concurrent_sessions
            .map(|max| Arc::new(Semaphore::new(max)));

        let handles: Vec<_> = sessions
            .iter()
            .map(|session| {
                let registry = Arc::clone(&self.registry);
                let list = list.clone();
                let session = Arc::clone(session);
                let semaphore = semaphore.clone();

                tokio::spawn(async move {
                    let _permit = match semaphore.as_ref() {
                        Some(semaphore) => {
                            Some(semaphore.acquire().await.expect("Semaphore closed"))
                        }
                        None => None,
                    };

                    let summary = run_pipeline(&registry, &list, &session).await;
                    (session.host().to_string(), summary)
                })
            })
            .collect();

        let joined = join_all(handles).await;

        let mut summaries = SummaryMap::new();
        for (index, outcome) in joined.into_iter().enumerate() {
            match outcome {
                Ok((host, summary)) => {
                    if summaries.contains_key(&host) {
                        warn!("Duplicate session host {}; keeping the later summary", host);
                    }
                    summaries.insert(host, summary);
                }
                Err(join_error) => {
                    // The pipeline task panicked or was cancelled; the
                    // other sessions' pipelines are unaffected.
                    let host = sessions[index].host().to_string();
                    error!("Session pipeline for {} aborted: {}", host, join_error);

                    let mut summary = Summary::new();
                    summary.error = Some(ExecutionError::PipelineAborted {
                        host: host.clone(),
                        message: join_error.to_string(),
                    });
                    summary.mark_completed();
                    summaries.insert(host, summary);
                }
            }
        }

        info!(
            "Task list run completed: {} ({} sessions, run_id: {})",
            list.name(),
            summaries.len(),
            run_id
        );
        summaries
    }
}

/// Drive one session's strictly sequential pipeline to a terminal
/// state and build its summary.
async fn run_pipeline(registry: &TaskRegistry, list: &TaskList, session: &SessionRef) -> Summary {
    let mut context = ExecutionContext::new();
    let mut summary = Summary::new();

    debug!(
        "Starting pipeline: {} on {} ({} invocations)",
        list.name(),
        session.host(),
        list.len()
    );

    for invocation in list.invocations() {
        let started = Instant::now();

        // Resolved immediately before dispatch so lazy options see the
        // context as mutated by the preceding task's output mapper.
        let options = invocation.options.resolve(&context);

        let handler = match registry.resolve(&invocation.task_type) {
            Some(handler) => handler,
            None => {
                error!(
                    "Unknown task type {} for task {} on {}",
                    invocation.task_type,
                    invocation.display_name,
                    session.host()
                );
                summary.error = Some(ExecutionError::UnknownTaskType {
                    task_type: invocation.task_type.clone(),
                });
                break;
            }
        };

        debug!(
            "Dispatching task {} (type: {}) on {}",
            invocation.display_name,
            invocation.task_type,
            session.host()
        );

        match handler.execute(Arc::clone(session), options).await {
            Ok(output) => {
                if let Some(mapper) = &invocation.output_mapper {
                    if let Err(mapper_error) = mapper(&mut context, &output) {
                        // Context corruption, not a task failure:
                        // ignore_errors does not apply.
                        let message = mapper_error.to_string();
                        error!(
                            "Output mapper failed for task {} on {}: {}",
                            invocation.display_name,
                            session.host(),
                            message
                        );
                        summary.record(HistoryEntry::failed(
                            &invocation.display_name,
                            message.clone(),
                            started.elapsed(),
                        ));
                        summary.error = Some(ExecutionError::OutputMapperFailed {
                            task: invocation.display_name.clone(),
                            message,
                        });
                        break;
                    }
                }

                summary.record(HistoryEntry::success(
                    &invocation.display_name,
                    started.elapsed(),
                ));
            }
            Err(task_error) => {
                let message = task_error.to_string();
                summary.record(HistoryEntry::failed(
                    &invocation.display_name,
                    message.clone(),
                    started.elapsed(),
                ));

                if list.config().ignore_errors {
                    warn!(
                        "Task {} failed on {} (ignored): {}",
                        invocation.display_name,
                        session.host(),
                        message
                    );
                } else {
                    error!(
                        "Task {} failed on {}: {}",
                        invocation.display_name,
                        session.host(),
                        message
                    );
                    summary.error = Some(ExecutionError::TaskFailed {
                        task: invocation.display_name.clone(),
                        message,
                    });
                    break;
                }
            }
        }
    }

    summary.mark_completed();
    debug!(
        "Pipeline finished: {} on {} ({} entries, error: {})",
        list.name(),
        session.host(),
        summary.history.len(),
        summary.error.is_some()
    );
    summary
}
