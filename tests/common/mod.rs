// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides shared recording handlers and session setup for engine tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use convoy::{HostSession, SessionRef, TaskOptions, TaskOutput, TaskRegistry};

pub fn session(host: &str) -> SessionRef {
    Arc::new(HostSession::new(host))
}

/// Captures the resolved options every dispatch receives, tagged with
/// the host the dispatch ran against.
#[derive(Clone, Default)]
pub struct OptionsRecorder {
    seen: Arc<Mutex<Vec<(String, TaskOptions)>>>,
}

impl OptionsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, host: &str, options: &TaskOptions) {
        self.seen
            .lock()
            .unwrap()
            .push((host.to_string(), options.clone()));
    }

    pub fn recorded(&self) -> Vec<TaskOptions> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, options)| options.clone())
            .collect()
    }

    pub fn recorded_for(&self, host: &str) -> Vec<TaskOptions> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(seen_host, _)| seen_host == host)
            .map(|(_, options)| options.clone())
            .collect()
    }
}

/// Register a task that always succeeds and records the options it saw.
pub fn register_recording_task(
    registry: &mut TaskRegistry,
    task_type: &str,
    recorder: &OptionsRecorder,
) {
    let recorder = recorder.clone();
    registry.register_fn(task_type, move |session, options| {
        let recorder = recorder.clone();
        async move {
            recorder.record(session.host(), &options);
            Ok(TaskOutput::new())
        }
    });
}

/// Register a task that fails with `message` whenever the option under
/// `key` equals `trigger`, and succeeds otherwise.
pub fn register_failing_task(
    registry: &mut TaskRegistry,
    task_type: &str,
    key: &str,
    trigger: i64,
    message: &str,
) {
    let key = key.to_string();
    let message = message.to_string();
    registry.register_fn(task_type, move |_session, options| {
        let should_fail = options.get_i64(&key) == Some(trigger);
        let message = message.clone();
        async move {
            if should_fail {
                Err(anyhow::anyhow!(message))
            } else {
                Ok(TaskOutput::new())
            }
        }
    });
}
