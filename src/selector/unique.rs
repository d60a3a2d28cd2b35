use crate::dom::{class_list, previous_element_siblings, tag_name};
use crate::selector::css_escape;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Separator between path segments
pub const SEGMENT_SEPARATOR: &str = " > ";

/// One element of an ancestor chain, as needed to build its selector segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Lowercase tag name
    pub tag: String,

    #[serde(default)]
    pub id: Option<String>,

    /// Class tokens in attribute order
    #[serde(default)]
    pub classes: Vec<String>,

    /// 1-based position among same-tag siblings
    pub nth_of_type: usize,
}

impl PathSegment {
    /// Describe a parsed element
    pub fn of(element: ElementRef<'_>) -> Self {
        Self {
            tag: tag_name(element),
            id: element.value().id().map(str::to_string),
            classes: class_list(element).into_iter().map(str::to_string).collect(),
            nth_of_type: nth_of_type(element),
        }
    }

    fn render(&self) -> String {
        let mut segment = self.tag.clone();
        if !self.classes.is_empty() {
            segment.push('.');
            segment.push_str(&self.classes.join("."));
        }
        segment.push_str(&format!(":nth-of-type({})", self.nth_of_type));
        segment
    }
}

/// Ancestor-or-self chain of `element`, root first
pub fn element_path(element: ElementRef<'_>) -> Vec<PathSegment> {
    let mut path = Vec::new();
    let mut current = Some(element);
    while let Some(el) = current {
        path.push(PathSegment::of(el));
        current = el.parent().and_then(ElementRef::wrap);
    }
    path.reverse();
    path
}

/// Build the selector of the last element of a root-first chain.
///
/// A target with a non-empty `id` yields `#<escaped id>` with no ancestors.
/// Otherwise every segment contributes `tag(.class)*:nth-of-type(n)`, root first.
/// Class names are used verbatim.
pub fn selector_from_path(path: &[PathSegment]) -> String {
    let Some(target) = path.last() else {
        return String::new();
    };
    if let Some(id) = target.id.as_deref().filter(|id| !id.is_empty()) {
        return format!("#{}", css_escape(id));
    }
    path.iter()
        .map(PathSegment::render)
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

/// Compute a selector locating `element` within its document
pub fn unique_selector(element: ElementRef<'_>) -> String {
    selector_from_path(&element_path(element))
}

/// 1-based position of `element` among its same-tag siblings
pub fn nth_of_type(element: ElementRef<'_>) -> usize {
    let tag = tag_name(element);
    1 + previous_element_siblings(element)
        .filter(|sibling| tag_name(*sibling) == tag)
        .count()
}
