// ABOUTME: Per-pipeline scratch state threaded between sequential tasks
// ABOUTME: Written by output mappers, read by lazy option resolvers

use serde_json::Value;
use std::collections::HashMap;

/// Mutable scratch state for one (task list, session) execution.
///
/// Seeded empty when the pipeline starts and discarded when it ends.
/// Output mappers write into it; lazy option resolvers of later
/// invocations in the same pipeline read from it. Never shared across
/// sessions - this is the isolation boundary between their pipelines.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    values: HashMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
