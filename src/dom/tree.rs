use crate::dom::selector_map::{ElementSelector, SelectorMap};
use crate::dom::{child_elements, tag_name};
use crate::error::{DatasetError, Result};
use crate::selector::SelectorGenerator;
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
#[derive(Debug, Clone)]
pub struct DomTree {
    document: Html,

    /// Selectors of the body-level elements, filled by [`DomTree::annotate`]
    pub selector_map: SelectorMap,
}

impl DomTree {
    /// Parse markup as a full document; fragments are placed inside a synthetic `<body>`
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            selector_map: SelectorMap::new(),
        }
    }

    /// The underlying parsed document
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// The `<html>` element
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// The `<body>` element, if the parser produced one
    pub fn body(&self) -> Option<ElementRef<'_>> {
        child_elements(self.root()).find(|el| el.value().name() == "body")
    }

    /// Direct child elements of `<body>`, in document order
    pub fn top_level_elements(&self) -> Vec<ElementRef<'_>> {
        self.body()
            .map(|body| child_elements(body).collect())
            .unwrap_or_default()
    }

    /// All elements matching a CSS selector
    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = Selector::parse(css)
            .map_err(|e| DatasetError::InvalidParams(format!("Invalid selector '{}': {}", css, e)))?;
        Ok(self.document.select(&selector).collect())
    }

    /// Generate a selector for each body-level element and record it in the selector map
    pub fn annotate(&mut self, generator: &SelectorGenerator) -> &SelectorMap {
        let mut map = SelectorMap::new();
        for element in self.top_level_elements() {
            let css = generator.generate(&self.document, element);
            let mut selector = ElementSelector::new(css, tag_name(element)).with_html(element.html());
            if let Some(id) = element.value().id() {
                selector = selector.with_id(id);
            }
            map.register(selector);
        }
        self.selector_map = map;
        &self.selector_map
    }
}
