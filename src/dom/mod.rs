//! DOM parsing and inspection
//!
//! This module provides the document model the selector code runs against:
//! - DomTree: a parsed HTML document with body-level element access
//! - ElementNode: serializable snapshot of an element
//! - SelectorMap: body-level elements paired with their generated selectors

pub mod element;
pub mod selector_map;
pub mod tree;

pub use element::ElementNode;
pub use selector_map::{ElementSelector, SelectorMap};
pub use tree::DomTree;

use scraper::ElementRef;

/// Lowercase tag name of an element
pub fn tag_name(element: ElementRef<'_>) -> String {
    element.value().name().to_ascii_lowercase()
}

/// Class tokens of an element in attribute order, duplicates removed
pub fn class_list(element: ElementRef<'_>) -> Vec<&str> {
    let mut classes: Vec<&str> = Vec::new();
    if let Some(attr) = element.value().attr("class") {
        for class in attr.split_ascii_whitespace() {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
    }
    classes
}

/// Element children of an element
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Element siblings preceding an element, nearest first
pub fn previous_element_siblings<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.prev_siblings().filter_map(ElementRef::wrap)
}
