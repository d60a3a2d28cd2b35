use crate::error::Result;
use crate::jsonl;
use crate::record::{LineRecord, RawRecord};
use crate::tools::{Tool, ToolContext, ToolResult};
use rand::Rng;
use rand::seq::SliceRandom;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Records appended per run unless overridden
pub const DEFAULT_COUNT: usize = 1000;

/// Markup shapes for synthetic records; `{i}` is replaced by the record index
pub const TEMPLATES: [&str; 20] = [
    "<a href='https://example.com/{i}'>Link {i}</a>",
    "<div class='box{i}' id='div{i}'><p>Paragraph {i}</p></div>",
    "<span class='highlight{i}' data-id='{i}'>Span {i}</span>",
    "<img src='img{i}.png' alt='Image {i}'/>",
    "<button class='btn{i}'>Button {i}</button>",
    "<header class='header{i}'><h1>Header {i}</h1></header>",
    "<form id='form{i}' action='/submit{i}'><input name='field{i}'/><button>Send</button></form>",
    "<article id='article{i}'><h2>Heading {i}</h2><p>Body {i}</p></article>",
    "<nav id='nav{i}'><a href='/home{i}'>Home</a><a href='/about{i}'>About</a></nav>",
    "<table class='table{i}'><tr><td>Cell {i}a</td><td>Cell {i}b</td></tr></table>",
    "<section id='section{i}'><h3>Title {i}</h3><p>Section {i}</p></section>",
    "<footer class='footer{i}'><p>Footer {i}</p></footer>",
    "<ul id='list{i}'><li>Item {i}a</li><li>Item {i}b</li></ul>",
    "<video controls src='video{i}.mp4'></video>",
    "<audio controls src='audio{i}.mp3'></audio>",
    "<input type='text' id='input{i}' value='Value {i}'/>",
    "<progress value='{i}' max='100'></progress>",
    "<iframe src='frame{i}.html' title='Frame {i}'></iframe>",
    "<select id='select{i}'><option value='A{i}'>A{i}</option><option value='B{i}'>B{i}</option></select>",
    "<canvas id='canvas{i}' width='200' height='100'></canvas>",
];

/// Parameters for the generate tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GenerateParams {
    /// Raw dataset to append to (default: `data/dataset.jsonl`)
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Number of new records (default: 1000)
    #[serde(default)]
    pub count: Option<usize>,
}

/// Markup already present in a raw dataset; a missing file is an empty set
pub fn existing_markup(path: &Path) -> Result<HashSet<String>> {
    let mut existing = HashSet::new();
    if !path.is_file() {
        return Ok(existing);
    }
    for line in jsonl::open_lines(path)? {
        let line = line?;
        if let LineRecord::Markup(record) = RawRecord::classify(&line.text) {
            if !record.html.is_empty() {
                existing.insert(record.html);
            }
        }
    }
    Ok(existing)
}

/// Produce `count` records whose markup is absent from `existing`.
///
/// Indices start at `existing.len()` and increase by one per attempt; accepted
/// markup is added to `existing`.
pub fn generate_records<R: Rng>(count: usize, existing: &mut HashSet<String>, rng: &mut R) -> Vec<RawRecord> {
    let mut records = Vec::with_capacity(count);
    let mut index = existing.len();

    while records.len() < count {
        let Some(template) = TEMPLATES.choose(rng) else {
            break;
        };
        let html = template.replace("{i}", &index.to_string());
        if existing.insert(html.clone()) {
            records.push(RawRecord::new(html));
        }
        index += 1;
    }

    records
}

/// Tool appending synthetic markup to the raw dataset
#[derive(Default)]
pub struct GenerateTool;

impl Tool for GenerateTool {
    type Params = GenerateParams;

    fn name(&self) -> &str {
        "generate"
    }

    fn execute_typed(&self, params: GenerateParams, context: &mut ToolContext) -> Result<ToolResult> {
        let output = params.output.unwrap_or_else(|| context.paths.raw.clone());
        let count = params.count.unwrap_or(DEFAULT_COUNT);

        let mut existing = existing_markup(&output)?;
        let before = existing.len();
        log::info!("Generating {} records into {} ({} existing)", count, output.display(), before);

        let records = generate_records(count, &mut existing, &mut context.rng);
        let mut writer = jsonl::append_output(&output)?;
        for record in &records {
            jsonl::write_record(&mut writer, record)?;
        }
        std::io::Write::flush(&mut writer)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "output": output,
            "generated": records.len(),
            "existing": before
        }))
        .with_report(format!("Generated {} new records ({} existing)", records.len(), before)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetPaths;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_markup_is_unique_and_fresh() {
        let mut existing: HashSet<String> = ["<p>old</p>".to_string()].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(3);
        let records = generate_records(200, &mut existing, &mut rng);

        assert_eq!(records.len(), 200);
        let unique: HashSet<_> = records.iter().map(|r| r.html.as_str()).collect();
        assert_eq!(unique.len(), 200);
        assert!(!unique.contains("<p>old</p>"));
        assert_eq!(existing.len(), 201);
        assert!(records.iter().all(|r| !r.html.contains("{i}")));
    }

    #[test]
    fn test_indices_start_after_existing() {
        let mut existing: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let records = generate_records(1, &mut existing, &mut rng);
        assert!(records[0].html.contains('3'));
    }

    #[test]
    fn test_tool_appends_to_raw_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DatasetPaths::in_dir(dir.path());
        std::fs::write(&paths.raw, "{\"html\":\"<p>seed</p>\"}\nbroken\n").unwrap();

        let mut context = ToolContext::with_seed(paths.clone(), 5);
        let result = GenerateTool
            .execute_typed(GenerateParams { output: None, count: Some(25) }, &mut context)
            .unwrap();
        assert_eq!(result.report.as_deref(), Some("Generated 25 new records (1 existing)"));

        let content = std::fs::read_to_string(&paths.raw).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 27);
        assert_eq!(lines[0], "{\"html\":\"<p>seed</p>\"}");
        assert_eq!(existing_markup(&paths.raw).unwrap().len(), 26);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(existing_markup(&dir.path().join("none.jsonl")).unwrap().is_empty());
    }
}
