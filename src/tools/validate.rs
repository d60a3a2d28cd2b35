use crate::config::DatasetPaths;
use crate::error::{DatasetError, Result};
use crate::jsonl::{self, JsonlLines};
use crate::record::AnnotatedRecord;
use crate::tools::{Tool, ToolContext, ToolResult};
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Number of records kept for manual inspection
pub const SAMPLE_SIZE: usize = 5;

/// Parameters for the validate tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ValidateParams {
    /// Dataset to check; defaults to the final dataset, then the annotator output
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Fixed-capacity reservoir sample
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
    capacity: usize,
    items: Vec<T>,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Offer an item; `seen` is the stream position used for the replacement draw.
    ///
    /// Validation passes the count of all lines read so far, not only eligible ones,
    /// so invalid lines bias the sample.
    pub fn offer<R: Rng>(&mut self, item: T, seen: usize, rng: &mut R) {
        if self.items.len() < self.capacity {
            self.items.push(item);
            return;
        }
        let slot = rng.gen_range(0..seen.max(1));
        if slot < self.capacity {
            self.items[slot] = item;
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Non-blank lines read
    pub total: usize,
    /// Lines with string `html` and `selector`
    pub eligible: usize,
    /// 1-based numbers of lines that were not JSON
    pub invalid_lines: Vec<usize>,
    /// Sampled records, verbatim
    pub samples: Vec<Value>,
}

impl ValidationReport {
    pub fn render(&self) -> String {
        let mut lines = vec![format!("Total lines: {}", self.total), "Examples:".to_string()];
        lines.extend(self.samples.iter().map(Value::to_string));
        lines.join("\n")
    }
}

/// Count lines, report malformed ones and sample eligible records
pub fn validate_stream<R: BufRead, G: Rng>(input: R, rng: &mut G) -> Result<ValidationReport> {
    let mut total = 0;
    let mut eligible = 0;
    let mut invalid_lines = Vec::new();
    let mut reservoir = Reservoir::new(SAMPLE_SIZE);

    for line in JsonlLines::new(input) {
        let line = line?;
        total = line.number;

        match jsonl::parse_value(&line.text) {
            Ok(value) => {
                if AnnotatedRecord::is_eligible(&value) {
                    eligible += 1;
                    reservoir.offer(value, total, rng);
                }
            }
            Err(_) => {
                log::error!("Invalid JSON on line {}", line.number);
                invalid_lines.push(line.number);
            }
        }
    }

    Ok(ValidationReport {
        total,
        eligible,
        invalid_lines,
        samples: reservoir.into_items(),
    })
}

/// Pick the dataset to validate.
///
/// An explicit path is tried first and the annotator output second; without one the
/// final dataset is tried before the annotator output.
pub fn resolve_dataset(explicit: Option<&Path>, paths: &DatasetPaths) -> Result<PathBuf> {
    let candidates = match explicit {
        Some(path) => [path, paths.annotated.as_path()],
        None => paths.validation_candidates(),
    };
    let mut tried = Vec::new();
    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate.to_path_buf());
        }
        tried.push(candidate.to_path_buf());
    }
    Err(DatasetError::DatasetNotFound { tried })
}

/// Tool summarizing a finished dataset
#[derive(Default)]
pub struct ValidateTool;

impl Tool for ValidateTool {
    type Params = ValidateParams;

    fn name(&self) -> &str {
        "validate"
    }

    fn execute_typed(&self, params: ValidateParams, context: &mut ToolContext) -> Result<ToolResult> {
        let path = resolve_dataset(params.path.as_deref(), &context.paths)?;
        log::info!("Validating {}", path.display());

        let reader = std::io::BufReader::new(std::fs::File::open(&path)?);
        let report = validate_stream(reader, &mut context.rng)?;

        Ok(ToolResult::success_with(serde_json::to_value(&report)?).with_report(report.render()))
    }
}
