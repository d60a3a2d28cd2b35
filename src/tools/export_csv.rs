use crate::config::SELECTOR_DATASET_FILE;
use crate::csv::write_row;
use crate::error::{DatasetError, Result};
use crate::jsonl::{self, JsonlLines};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Parameters for the export_csv tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExportCsvParams {
    /// JSONL dataset (default: `data/dataset_with_selector.jsonl`)
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// CSV destination (default: `data/dataset_with_selector.csv`)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// CSV cell text for a JSON field; `None` when the field is missing or null
fn cell(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Write a `html,selector` header and one row per usable JSON line; returns the row count
pub fn export_stream<R: BufRead, W: Write>(input: R, output: &mut W) -> Result<usize> {
    write_row(output, &["html", "selector"])?;
    let mut rows = 0;

    for line in JsonlLines::new(input) {
        let line = line?;
        let Ok(value) = jsonl::parse_value(&line.text) else {
            log::debug!("line {}: invalid JSON, skipped", line.number);
            continue;
        };
        if let (Some(html), Some(selector)) = (cell(&value, "html"), cell(&value, "selector")) {
            write_row(output, &[html, selector])?;
            rows += 1;
        }
    }

    output.flush()?;
    Ok(rows)
}

/// Input resolution: a missing default dataset falls back to the annotator output
fn resolve_input(input: &Path, fallback: &Path) -> Result<PathBuf> {
    if input.is_file() {
        return Ok(input.to_path_buf());
    }
    let is_default_name = input.file_name().is_some_and(|name| name == SELECTOR_DATASET_FILE);
    if is_default_name && fallback.is_file() {
        return Ok(fallback.to_path_buf());
    }
    Err(DatasetError::InputNotFound(input.to_path_buf()))
}

/// Tool converting the final dataset to CSV
#[derive(Default)]
pub struct ExportCsvTool;

impl Tool for ExportCsvTool {
    type Params = ExportCsvParams;

    fn name(&self) -> &str {
        "export_csv"
    }

    fn execute_typed(&self, params: ExportCsvParams, context: &mut ToolContext) -> Result<ToolResult> {
        let requested = params.input.unwrap_or_else(|| context.paths.selector_dataset.clone());
        let input = resolve_input(&requested, &context.paths.annotated)?;
        let output = params.output.unwrap_or_else(|| context.paths.csv.clone());
        log::info!("Exporting {} -> {}", input.display(), output.display());

        let reader = std::io::BufReader::new(std::fs::File::open(&input)?);
        let mut writer = jsonl::create_output(&output)?;
        let rows = export_stream(reader, &mut writer)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "input": input,
            "output": output,
            "rows": rows
        }))
        .with_report(format!("Rows written: {}", rows)))
    }
}
