use crate::error::Result;
use crate::jsonl::{self, JsonlLines};
use crate::record::{LineRecord, RawRecord};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Parameters for the dedup tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DedupParams {
    /// Raw records (default: `data/dataset.jsonl`)
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Deduplicated output (default: `data/dataset_clean.jsonl`)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Counters reported by the deduplicator; `valid + invalid + duplicates == total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    /// Non-blank input lines
    pub total: usize,
    /// Unique records written
    pub valid: usize,
    /// Lines that were not JSON or had no string `html`
    pub invalid: usize,
    /// Repeated markup dropped silently
    pub duplicates: usize,
}

impl fmt::Display for DedupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total lines: {}", self.total)?;
        writeln!(f, "Valid unique lines written: {}", self.valid)?;
        write!(f, "Invalid lines ignored: {}", self.invalid)
    }
}

/// Stream records from `input` to `output`, keeping the first occurrence of each markup value
pub fn dedup_stream<R: BufRead, W: Write>(input: R, output: &mut W) -> Result<DedupStats> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut stats = DedupStats::default();

    for line in JsonlLines::new(input) {
        let line = line?;
        stats.total += 1;

        match RawRecord::classify(&line.text) {
            LineRecord::Markup(record) => {
                if seen.contains(&record.html) {
                    stats.duplicates += 1;
                    continue;
                }
                jsonl::write_record(output, &record)?;
                seen.insert(record.html);
                stats.valid += 1;
            }
            LineRecord::MissingHtml(_) => {
                log::debug!("line {}: no string html field", line.number);
                stats.invalid += 1;
            }
            LineRecord::Malformed(reason) => {
                log::debug!("line {}: {}", line.number, reason);
                stats.invalid += 1;
            }
        }
    }

    output.flush()?;
    Ok(stats)
}

/// Tool removing invalid and duplicate markup records
#[derive(Default)]
pub struct DedupTool;

impl Tool for DedupTool {
    type Params = DedupParams;

    fn name(&self) -> &str {
        "dedup"
    }

    fn execute_typed(&self, params: DedupParams, context: &mut ToolContext) -> Result<ToolResult> {
        let input = params.input.unwrap_or_else(|| context.paths.raw.clone());
        let output = params.output.unwrap_or_else(|| context.paths.clean.clone());
        log::info!("Deduplicating {} -> {}", input.display(), output.display());

        let reader = std::io::BufReader::new(std::fs::File::open(&input)?);
        let mut writer = jsonl::create_output(&output)?;
        let stats = dedup_stream(reader, &mut writer)?;

        Ok(ToolResult::success_with(serde_json::to_value(stats)?).with_report(stats.to_string()))
    }
}
