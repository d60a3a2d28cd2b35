//! CSS selector synthesis
//!
//! - [`unique_selector`], [`selector_from_path`]: ancestor-chain selector used by the interactive capture
//! - [`SelectorGenerator`]: shortest-unique-candidate generator used by the annotator
//! - [`css_escape`]: identifier escaping shared by both

pub mod escape;
pub mod generator;
pub mod unique;

pub use escape::css_escape;
pub use generator::SelectorGenerator;
pub use unique::{PathSegment, element_path, nth_of_type, selector_from_path, unique_selector};
