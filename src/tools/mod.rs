//! Tools: named, schema-described capabilities the server executes on behalf
//! of the client.

pub mod random_number;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::ToolDescriptor;

/// Arguments passed to a tool invocation.
pub type Arguments = Map<String, Value>;

type Executor = Box<dyn Fn(&Arguments) -> Result<Value, ToolError> + Send + Sync>;

/// Failure raised by a tool function.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },
    #[error("{0}")]
    Failed(String),
    #[error("result is not serializable: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// An immutable named capability with a declared input schema.
///
/// The executor may be invoked from a blocking worker thread, so it must be
/// `Send + Sync` and safe to call repeatedly.
pub struct Tool {
    name: String,
    description: String,
    input_schema: Value,
    executor: Executor,
}

impl Tool {
    /// Build a tool from a function returning any serializable value.
    pub fn new<F, T>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        f: F,
    ) -> Self
    where
        F: Fn(&Arguments) -> Result<T, ToolError> + Send + Sync + 'static,
        T: Serialize,
    {
        let executor: Executor = Box::new(move |args| {
            f(args).and_then(|out| serde_json::to_value(out).map_err(ToolError::from))
        });
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Invoke the tool. Errors are returned to the caller untouched.
    pub fn execute(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        (self.executor)(arguments)
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Text form of a tool's return value: strings verbatim, `null` as the empty
/// string, everything else as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Tools keyed by name, kept in registration order.
///
/// Registering a name that already exists replaces the earlier tool in place,
/// so listing order is that of the first registration.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, returning the tool it replaced, if any.
    pub fn register(&mut self, tool: Tool) -> Option<Arc<Tool>> {
        let tool = Arc::new(tool);
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => Some(std::mem::replace(slot, tool)),
            None => {
                self.tools.push(tool);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Tool>> {
        self.tools.iter()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
