use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory holding every pipeline file
pub const DEFAULT_DATA_DIR: &str = "data";

pub const RAW_FILE: &str = "dataset.jsonl";
pub const CLEAN_FILE: &str = "dataset_clean.jsonl";
pub const ANNOTATED_FILE: &str = "dataset_with_selector_multi.jsonl";
pub const SELECTOR_DATASET_FILE: &str = "dataset_with_selector.jsonl";
pub const CSV_FILE: &str = "dataset_with_selector.csv";

/// Locations of the files flowing through the pipeline
///
/// raw → `dedup` → clean → `annotate` → annotated → `validate` / `export_csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPaths {
    /// Raw markup records (`{html}` per line)
    pub raw: PathBuf,

    /// Deduplicated markup records
    pub clean: PathBuf,

    /// Annotator output (`{html, selector}` per top-level element)
    pub annotated: PathBuf,

    /// Preferred final dataset; validation falls back to `annotated` when it is missing
    pub selector_dataset: PathBuf,

    /// CSV export of the final dataset
    pub csv: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

impl DatasetPaths {
    /// Create paths rooted at the default data directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Place every file under `dir` using the standard file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            raw: dir.join(RAW_FILE),
            clean: dir.join(CLEAN_FILE),
            annotated: dir.join(ANNOTATED_FILE),
            selector_dataset: dir.join(SELECTOR_DATASET_FILE),
            csv: dir.join(CSV_FILE),
        }
    }

    /// Builder method: set the raw input path
    pub fn raw(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw = path.into();
        self
    }

    /// Builder method: set the deduplicated output path
    pub fn clean(mut self, path: impl Into<PathBuf>) -> Self {
        self.clean = path.into();
        self
    }

    /// Builder method: set the annotator output path
    pub fn annotated(mut self, path: impl Into<PathBuf>) -> Self {
        self.annotated = path.into();
        self
    }

    /// Builder method: set the preferred final dataset path
    pub fn selector_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.selector_dataset = path.into();
        self
    }

    /// Builder method: set the CSV export path
    pub fn csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv = path.into();
        self
    }

    /// Candidate files for validation, in lookup order
    pub fn validation_candidates(&self) -> [&Path; 2] {
        [self.selector_dataset.as_path(), self.annotated.as_path()]
    }
}
