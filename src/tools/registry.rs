//! Tool registry: named, schema-described callables.

use super::args::ToolArgs;
use super::schema::{ParamDecl, ParameterSchema};
use crate::config::DuplicatePolicy;
use crate::error::{ChorusError, Result};
use crate::model::ToolSchema;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A function that can be exposed to a model as a tool.
#[async_trait]
pub trait ToolFunction: Send + Sync {
    /// Declared parameters, in order.
    fn parameters(&self) -> Vec<ParamDecl>;

    /// Execute the tool with validated arguments.
    async fn call(&self, args: ToolArgs) -> Result<String>;
}

/// Adapter turning a plain synchronous closure into a [`ToolFunction`].
pub struct FnTool<F> {
    params: Vec<ParamDecl>,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(&ToolArgs) -> Result<String> + Send + Sync + 'static,
{
    pub fn new(params: Vec<ParamDecl>, func: F) -> Self {
        Self { params, func }
    }
}

#[async_trait]
impl<F> ToolFunction for FnTool<F>
where
    F: Fn(&ToolArgs) -> Result<String> + Send + Sync + 'static,
{
    fn parameters(&self) -> Vec<ParamDecl> {
        self.params.clone()
    }

    async fn call(&self, args: ToolArgs) -> Result<String> {
        (self.func)(&args)
    }
}

/// What a tool name dispatches to.
#[derive(Clone)]
pub enum ToolKind {
    /// A registered function.
    Function(Arc<dyn ToolFunction>),
    /// Another agent in the same graph, invoked with a free-text query.
    Agent(String),
}

impl std::fmt::Debug for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolKind::Function(_) => write!(f, "Function"),
            ToolKind::Agent(name) => write!(f, "Agent({})", name),
        }
    }
}

/// Registered metadata for one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
    pub kind: ToolKind,
}

impl ToolDescriptor {
    /// Build a descriptor for a function tool, inferring its schema.
    pub fn function(name: &str, description: &str, function: Arc<dyn ToolFunction>) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ChorusError::MissingDescription(name.to_string()));
        }

        let parameters = ParameterSchema::infer(name, &function.parameters())?;

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            kind: ToolKind::Function(function),
        })
    }

    /// Build a descriptor exposing an agent as a tool.
    pub fn agent(name: &str, description: &str) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ChorusError::MissingDescription(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: ParameterSchema::query(),
            kind: ToolKind::Agent(name.to_string()),
        })
    }

    pub fn is_agent(&self) -> bool {
        matches!(self.kind, ToolKind::Agent(_))
    }

    /// Model-facing schema for this tool.
    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.to_json_schema(),
            strict: self.parameters.is_strict(),
        }
    }
}

/// Registry of function tools, populated once at startup.
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
    duplicates: DuplicatePolicy,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create an empty registry where re-registration overwrites.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Overwrite)
    }

    pub fn with_policy(duplicates: DuplicatePolicy) -> Self {
        Self {
            tools: BTreeMap::new(),
            duplicates,
        }
    }

    /// Register a function tool under `name`.
    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        function: Arc<dyn ToolFunction>,
    ) -> Result<()> {
        let descriptor = ToolDescriptor::function(name, description, function)?;

        if self.tools.contains_key(name) {
            match self.duplicates {
                DuplicatePolicy::Reject => return Err(ChorusError::DuplicateTool(name.to_string())),
                DuplicatePolicy::Overwrite => warn!("Tool '{}' re-registered, replacing previous definition", name),
            }
        }

        debug!("Registered tool '{}' ({} parameters)", name, descriptor.parameters.params().len());
        self.tools.insert(name.to_string(), descriptor);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&ToolDescriptor> {
        self.tools
            .get(name)
            .ok_or_else(|| ChorusError::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Schemas for the given subset of tools, in the order requested.
    pub fn describe_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ToolSchema>> {
        names
            .iter()
            .map(|name| self.resolve(name.as_ref()).map(ToolDescriptor::schema))
            .collect()
    }

    /// All registered descriptors, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
