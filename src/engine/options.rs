// ABOUTME: Option templates with literal and lazily resolved values
// ABOUTME: Resolves templates against the execution context right before dispatch

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::context::ExecutionContext;

/// Closure producing an option value from the current execution
/// context, evaluated immediately before the task is dispatched.
pub type LazyResolver = Arc<dyn Fn(&ExecutionContext) -> Value + Send + Sync>;

#[derive(Clone)]
pub enum OptionValue {
    Literal(Value),
    Lazy(LazyResolver),
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            OptionValue::Lazy(_) => f.debug_tuple("Lazy").field(&"<resolver>").finish(),
        }
    }
}

/// Ordered option template attached to one invocation.
///
/// Only top-level entries can be lazy; a literal value (including any
/// nested object) passes through resolution untouched.
#[derive(Debug, Clone, Default)]
pub struct OptionsTemplate {
    entries: IndexMap<String, OptionValue>,
}

impl OptionsTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .insert(key.into(), OptionValue::Literal(value.into()));
        self
    }

    pub fn with_lazy<F>(mut self, key: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&ExecutionContext) -> Value + Send + Sync + 'static,
    {
        self.entries
            .insert(key.into(), OptionValue::Lazy(Arc::new(resolver)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the resolved options for one dispatch: literals are copied,
    /// lazy entries are invoked with the context as it stands right now.
    pub fn resolve(&self, context: &ExecutionContext) -> TaskOptions {
        let mut values = IndexMap::with_capacity(self.entries.len());
        for (key, entry) in &self.entries {
            let value = match entry {
                OptionValue::Literal(value) => value.clone(),
                OptionValue::Lazy(resolver) => resolver(context),
            };
            values.insert(key.clone(), value);
        }
        TaskOptions { values }
    }
}

/// Fully resolved options handed to a task handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskOptions {
    values: IndexMap<String, Value>,
}

impl TaskOptions {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_values_pass_through() {
        let template = OptionsTemplate::new()
            .with("aa", 10)
            .with("nested", json!({"inner": {"deep": true}}));

        let options = template.resolve(&ExecutionContext::new());
        assert_eq!(options.get_i64("aa"), Some(10));
        assert_eq!(options.get("nested"), Some(&json!({"inner": {"deep": true}})));
    }

    #[test]
    fn test_lazy_values_see_current_context() {
        let template = OptionsTemplate::new()
            .with_lazy("data", |ctx| ctx.get("simple").cloned().unwrap_or(Value::Null))
            .with("aa", 20);

        let mut context = ExecutionContext::new();
        let before = template.resolve(&context);
        assert_eq!(before.get("data"), Some(&Value::Null));

        context.set("simple", json!({"v1": "value1"}));
        let after = template.resolve(&context);
        assert_eq!(after.get("data"), Some(&json!({"v1": "value1"})));
        assert_eq!(after.get_i64("aa"), Some(20));
    }

    #[test]
    fn test_resolution_preserves_declaration_order() {
        let template = OptionsTemplate::new()
            .with("first", 1)
            .with_lazy("second", |_| json!(2))
            .with("third", 3);

        let options = template.resolve(&ExecutionContext::new());
        let keys: Vec<&String> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_typed_accessors() {
        let options = OptionsTemplate::new()
            .with("name", "deploy")
            .with("retries", 4)
            .with("dry_run", true)
            .resolve(&ExecutionContext::new());

        assert_eq!(options.get_str("name"), Some("deploy"));
        assert_eq!(options.get_i64("retries"), Some(4));
        assert_eq!(options.get_bool("dry_run"), Some(true));
        assert_eq!(options.get("missing"), None);
        assert_eq!(options.len(), 3);
    }
}
