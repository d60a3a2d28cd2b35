use crate::dom::DomTree;
use crate::error::Result;
use crate::jsonl::{self, JsonlLines};
use crate::record::{LineRecord, RawRecord};
use crate::selector::SelectorGenerator;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Parameters for the annotate tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnnotateParams {
    /// Deduplicated records (default: `data/dataset_clean.jsonl`)
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Annotated output (default: `data/dataset_with_selector_multi.jsonl`)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateStats {
    /// Input records parsed successfully
    pub records: usize,
    /// Lines skipped because they could not be processed
    pub errors: usize,
    /// `{html, selector}` lines written
    pub selectors: usize,
}

/// Emit one `{html, selector}` line per body-level element of every input record
pub fn annotate_stream<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    generator: &SelectorGenerator,
) -> Result<AnnotateStats> {
    let mut stats = AnnotateStats::default();

    for line in JsonlLines::new(input) {
        let line = line?;
        let html = match RawRecord::classify(&line.text) {
            LineRecord::Markup(record) => record.html,
            LineRecord::MissingHtml(_) => {
                log::error!("Error processing line {}: missing string field 'html'", line.number);
                stats.errors += 1;
                continue;
            }
            LineRecord::Malformed(reason) => {
                log::error!("Error processing line {}: {}", line.number, reason);
                stats.errors += 1;
                continue;
            }
        };

        let mut tree = DomTree::parse(&html);
        for record in tree.annotate(generator).records() {
            jsonl::write_record(output, &record)?;
            stats.selectors += 1;
        }
        stats.records += 1;
    }

    output.flush()?;
    Ok(stats)
}

/// Tool pairing every top-level element of each record with a selector
#[derive(Default)]
pub struct AnnotateTool;

impl Tool for AnnotateTool {
    type Params = AnnotateParams;

    fn name(&self) -> &str {
        "annotate"
    }

    fn execute_typed(&self, params: AnnotateParams, context: &mut ToolContext) -> Result<ToolResult> {
        let input = params.input.unwrap_or_else(|| context.paths.clean.clone());
        let output = params.output.unwrap_or_else(|| context.paths.annotated.clone());
        log::info!("Annotating {} -> {}", input.display(), output.display());

        let reader = std::io::BufReader::new(std::fs::File::open(&input)?);
        let mut writer = jsonl::create_output(&output)?;
        let stats = annotate_stream(reader, &mut writer, &SelectorGenerator::new())?;

        Ok(ToolResult::success_with(serde_json::to_value(stats)?)
            .with_report(format!("Total selectors generated: {}", stats.selectors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AnnotatedRecord;
    use std::io::Cursor;

    fn run(input: &str) -> (Vec<AnnotatedRecord>, AnnotateStats) {
        let mut out = Vec::new();
        let stats = annotate_stream(Cursor::new(input.as_bytes()), &mut out, &SelectorGenerator::new()).unwrap();
        let records = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (records, stats)
    }

    #[test]
    fn test_one_output_per_top_level_element() {
        let input = r#"{"html":"<nav id='nav1'><a href='/home1'>Home</a><a href='/about1'>About</a></nav><p>x</p><p>y</p>"}"#;
        let (records, stats) = run(input);

        assert_eq!(records.len(), 3);
        assert_eq!(stats.selectors, 3);
        assert_eq!(stats.records, 1);
        assert_eq!(
            records[0],
            AnnotatedRecord::new(r#"<nav id="nav1"><a href="/home1">Home</a><a href="/about1">About</a></nav>"#, "#nav1")
        );
        assert_eq!(records[1].html, "<p>x</p>");
        assert_eq!(records[2].html, "<p>y</p>");
        assert_ne!(records[1].selector, records[2].selector);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let input = "oops\n{\"html\":\"<b>1</b>\"}\n{\"text\":\"x\"}\n";
        let (records, stats) = run(input);

        assert_eq!(records, vec![AnnotatedRecord::new("<b>1</b>", "b")]);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.records, 1);
    }

    #[test]
    fn test_text_only_markup_emits_nothing() {
        let (records, stats) = run("{\"html\":\"plain text\"}\n");
        assert!(records.is_empty());
        assert_eq!(stats.records, 1);
        assert_eq!(stats.selectors, 0);
    }

    #[test]
    fn test_head_content_is_not_top_level() {
        let (records, _) = run("{\"html\":\"<title>t</title><div class='box'></div>\"}\n");
        assert_eq!(records, vec![AnnotatedRecord::new(r#"<div class="box"></div>"#, ".box")]);
    }
}
