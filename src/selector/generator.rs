use crate::dom::{class_list, previous_element_siblings, tag_name};
use crate::selector::css_escape;
use scraper::{ElementRef, Html, Selector};

/// General-purpose selector generator used to annotate dataset records.
///
/// Candidates are tried from the most to the least specific kind of identifier, and
/// each is accepted only if it matches exactly the target within the document.
#[derive(Debug, Clone)]
pub struct SelectorGenerator {
    /// How many ancestors may qualify a candidate before falling back to the full path
    pub max_ancestors: usize,
}

impl Default for SelectorGenerator {
    fn default() -> Self {
        Self { max_ancestors: 8 }
    }
}

impl SelectorGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: limit ancestor qualification depth
    pub fn max_ancestors(mut self, depth: usize) -> Self {
        self.max_ancestors = depth;
        self
    }

    /// Return a selector that matches `target` and nothing else in `document`
    pub fn generate(&self, document: &Html, target: ElementRef<'_>) -> String {
        let own = candidates(target);

        if let Some(found) = own.iter().find(|c| matches_only(document, c, target)) {
            return found.clone();
        }

        let mut ancestor = target.parent().and_then(ElementRef::wrap);
        let mut depth = 0;
        while let Some(anc) = ancestor {
            if depth >= self.max_ancestors {
                break;
            }
            for outer in candidates(anc) {
                for inner in &own {
                    let combined = format!("{} {}", outer, inner);
                    if matches_only(document, &combined, target) {
                        return combined;
                    }
                }
            }
            ancestor = anc.parent().and_then(ElementRef::wrap);
            depth += 1;
        }

        log::debug!("falling back to positional path for <{}>", tag_name(target));
        positional_path(target)
    }
}

/// Selector candidates for a single element, most preferred first
fn candidates(element: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    let tag = css_escape(&tag_name(element));

    if let Some(id) = element.value().id().filter(|id| !id.is_empty()) {
        out.push(format!("#{}", css_escape(id)));
    }

    let classes: Vec<String> = class_list(element)
        .into_iter()
        .map(|c| format!(".{}", css_escape(c)))
        .collect();
    out.extend(classes.iter().cloned());
    if classes.len() > 1 {
        out.push(classes.concat());
    }

    out.push(tag.clone());
    if !classes.is_empty() {
        out.push(format!("{}{}", tag, classes.concat()));
    }
    out.push(format!("{}:nth-child({})", tag, nth_child(element)));
    out
}

/// 1-based position among all element siblings
fn nth_child(element: ElementRef<'_>) -> usize {
    1 + previous_element_siblings(element).count()
}

/// `html > tag:nth-child(n) > ...`, unique by construction
fn positional_path(target: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = target;
    while let Some(parent) = current.parent().and_then(ElementRef::wrap) {
        segments.push(format!("{}:nth-child({})", css_escape(&tag_name(current)), nth_child(current)));
        current = parent;
    }
    segments.push(css_escape(&tag_name(current)));
    segments.reverse();
    segments.join(" > ")
}

fn matches_only(document: &Html, css: &str, target: ElementRef<'_>) -> bool {
    let Ok(selector) = Selector::parse(css) else {
        return false;
    };
    let mut matches = document.select(&selector);
    match (matches.next(), matches.next()) {
        (Some(only), None) => only.id() == target.id(),
        _ => false,
    }
}
