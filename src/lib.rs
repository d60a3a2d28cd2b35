//! # selector-dataset
//!
//! Toolkit for building datasets of `(HTML fragment, CSS selector)` pairs, the kind of
//! data used to train models that locate elements in web pages.
//!
//! ## Features
//!
//! - **Deduplication**: drop malformed and repeated markup records from a raw JSONL file
//! - **Annotation**: pair every top-level element of each record with a short unique selector
//! - **Validation**: count lines, report malformed JSON and print a random sample
//! - **Export**: write the final dataset as CSV
//! - **Generation**: append synthetic markup records to the raw dataset
//! - **Capture**: open a page in Chrome and turn the next click into a selector
//!
//! ## Pipeline
//!
//! ```text
//! data/dataset.jsonl ──dedup──▶ data/dataset_clean.jsonl ──annotate──▶ data/dataset_with_selector_multi.jsonl
//!                                                                        │
//!                                                     validate / export_csv ◀┘
//! ```
//!
//! ## Library Usage
//!
//! ### Running a stage through the tool system
//!
//! ```rust,no_run
//! use selector_dataset::{DatasetPaths, ToolContext, ToolRegistry};
//! use serde_json::json;
//!
//! # fn main() -> selector_dataset::Result<()> {
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::new(DatasetPaths::in_dir("data"));
//!
//! let result = registry.execute("dedup", json!({}), &mut context)?;
//! println!("{}", result.report.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ### Generating a selector for an element
//!
//! ```rust
//! use selector_dataset::{DomTree, SelectorGenerator};
//!
//! let mut tree = DomTree::parse("<ul id='list1'><li>a</li></ul><p class='note'>b</p>");
//! let selectors: Vec<_> = tree.annotate(&SelectorGenerator::new()).records().collect();
//!
//! assert_eq!(selectors[0].selector, "#list1");
//! assert_eq!(selectors[1].selector, ".note");
//! ```
//!
//! ### Capturing a clicked element
//!
//! ```rust,no_run
//! use selector_dataset::{BrowserSession, ClickCapture, LaunchOptions};
//! use std::time::Duration;
//!
//! # fn main() -> selector_dataset::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::new().headless(false))?;
//! session.navigate("https://example.com")?;
//!
//! let mut capture = ClickCapture::new();
//! let captured = session.capture_click(&mut capture, Duration::from_millis(200), None)?;
//! println!("{}", captured.selector);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`selector`]: unique selector synthesis and CSS identifier escaping
//! - [`dom`]: parsed documents, element snapshots and selector maps
//! - [`browser`]: Chrome session management and the click capture
//! - [`tools`]: pipeline stages behind a name-indexed registry
//! - [`jsonl`], [`csv`], [`record`]: dataset file formats
//! - [`config`]: default file locations
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod config;
pub mod csv;
pub mod dom;
pub mod error;
pub mod jsonl;
pub mod record;
pub mod selector;
pub mod tools;

pub use browser::{BrowserSession, Capture, CaptureHost, ClickCapture, ClickedElement, ConnectionOptions, Highlight, LaunchOptions};
pub use config::DatasetPaths;
pub use dom::{DomTree, ElementNode, ElementSelector, SelectorMap};
pub use error::{DatasetError, Result};
pub use record::{AnnotatedRecord, RawRecord};
pub use selector::{SelectorGenerator, css_escape, unique_selector};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};
