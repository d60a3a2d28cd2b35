use crate::record::AnnotatedRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A located element together with the selector generated for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementSelector {
    /// CSS selector for the element
    pub css_selector: String,

    /// Element's tag name
    pub tag_name: String,

    /// Element's ID attribute (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Outer markup of the element
    pub html: String,
}

impl ElementSelector {
    /// Create a new ElementSelector with CSS selector
    pub fn new(css_selector: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            css_selector: css_selector.into(),
            tag_name: tag_name.into(),
            id: None,
            html: String::new(),
        }
    }

    /// Builder method: set ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set outer markup
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Convert into a dataset record
    pub fn to_record(&self) -> AnnotatedRecord {
        AnnotatedRecord::new(self.html.clone(), self.css_selector.clone())
    }
}

/// Body-level elements of one document with their selectors, in document order
#[derive(Debug, Clone, Default)]
pub struct SelectorMap {
    map: IndexMap<usize, ElementSelector>,
}

impl SelectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next element and return its position
    pub fn register(&mut self, selector: ElementSelector) -> usize {
        let index = self.map.len();
        self.map.insert(index, selector);
        index
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Selectors in registration order
    pub fn selectors(&self) -> impl Iterator<Item = &ElementSelector> {
        self.map.values()
    }

    /// Dataset records in registration order
    pub fn records(&self) -> impl Iterator<Item = AnnotatedRecord> + '_ {
        self.selectors().map(ElementSelector::to_record)
    }
}
