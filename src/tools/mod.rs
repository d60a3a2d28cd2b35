//! Pipeline stages exposed as tools
//!
//! Every stage implements [`Tool`] with typed parameters; the [`ToolRegistry`]
//! dispatches by name with JSON parameters, which is what the CLI uses.

pub mod annotate;
pub mod capture;
pub mod dedup;
pub mod export_csv;
pub mod generate;
pub mod validate;

pub use annotate::{AnnotateParams, AnnotateTool};
pub use capture::{CaptureParams, CaptureTool};
pub use dedup::{DedupParams, DedupTool};
pub use export_csv::{ExportCsvParams, ExportCsvTool};
pub use generate::{GenerateParams, GenerateTool};
pub use validate::{ValidateParams, ValidateTool};

use crate::config::DatasetPaths;
use crate::error::{DatasetError, Result};
use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shared state handed to every tool invocation
pub struct ToolContext {
    /// Default file locations
    pub paths: DatasetPaths,

    /// Random source for sampling and generation
    pub rng: StdRng,
}

impl ToolContext {
    /// Context with an entropy-seeded random source
    pub fn new(paths: DatasetPaths) -> Self {
        Self {
            paths,
            rng: StdRng::from_entropy(),
        }
    }

    /// Context with a deterministic random source
    pub fn with_seed(paths: DatasetPaths, seed: u64) -> Self {
        Self {
            paths,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Outcome of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    /// Structured output (counts, samples, selector)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable report printed by the CLI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            report: None,
        }
    }

    pub fn success_with(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::success()
        }
    }

    /// Result carrying the error of a failed run, as printed by `--json`
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            report: None,
        }
    }

    /// Builder method: attach the human-readable report
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }
}

/// A pipeline stage with typed parameters
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    /// JSON schema of the parameters
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or(Value::Null)
    }

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// Deserialize `params` and run the tool
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let typed: Self::Params =
            serde_json::from_value(params).map_err(|e| DatasetError::InvalidParams(e.to_string()))?;
        self.execute_typed(typed, context)
    }
}

/// Object-safe view of a [`Tool`]
trait DynTool: Send + Sync {
    fn parameters_schema(&self) -> Value;
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn parameters_schema(&self) -> Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        Tool::execute(self, params, context)
    }
}

/// Name-indexed collection of tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every pipeline stage
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DedupTool);
        registry.register(AnnotateTool);
        registry.register(ValidateTool);
        registry.register(ExportCsvTool);
        registry.register(GenerateTool);
        registry.register(CaptureTool);
        registry
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    /// Tool names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn schema(&self, name: &str) -> Option<Value> {
        self.tools.get(name).map(|tool| tool.parameters_schema())
    }

    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| DatasetError::ToolNotFound(name.to_string()))?;
        log::debug!("executing tool '{}'", name);
        tool.execute(params, context)
    }
}
