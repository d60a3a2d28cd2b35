use indexmap::IndexMap;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Serializable snapshot of a clicked element and its subtree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// Lowercase tag name (e.g., "div", "td")
    pub tag_name: String,

    /// Attributes in document order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Direct text content, trimmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    /// Snapshot a parsed element and its element descendants
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let mut node = Self::new(super::tag_name(element));
        for (key, value) in element.value().attrs() {
            node.attributes.insert(key.to_string(), value.to_string());
        }

        let text: String = element
            .children()
            .filter_map(|child| child.value().as_text())
            .map(|t| &**t)
            .collect();
        let text = text.trim();
        if !text.is_empty() {
            node.text_content = Some(text.to_string());
        }

        node.children = super::child_elements(element).map(Self::from_element).collect();
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_from_element() {
        let doc = Html::parse_document(r#"<ul id="list1" class="menu"><li>Item a</li><li>Item <b>b</b></li></ul>"#);
        let sel = Selector::parse("ul").unwrap();
        let ul = doc.select(&sel).next().unwrap();

        let node = ElementNode::from_element(ul);
        assert_eq!(node.tag_name, "ul");
        assert_eq!(node.attributes.get("id").map(String::as_str), Some("list1"));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].text_content.as_deref(), Some("Item a"));
        assert_eq!(node.children[1].text_content.as_deref(), Some("Item"));
        assert_eq!(node.children[1].children[0].tag_name, "b");
        assert!(node.text_content.is_none());
    }

    #[test]
    fn test_deserializes_page_snapshot() {
        // shape produced by the in-page capture script
        let node: ElementNode = serde_json::from_str(
            r#"{"tag_name":"td","attributes":{"class":"cell","data-row":"1"},"text_content":"r1c2"}"#,
        )
        .unwrap();
        assert_eq!(node.tag_name, "td");
        assert_eq!(node.attributes.keys().collect::<Vec<_>>(), vec!["class", "data-row"]);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_serialization_keeps_attribute_order() {
        let mut element = ElementNode::new("a");
        element.attributes.insert("href".to_string(), "/x".to_string());
        element.attributes.insert("class".to_string(), "link".to_string());
        element.attributes.insert("data-id".to_string(), "3".to_string());

        let json = serde_json::to_string(&element).unwrap();
        assert!(json.find("href").unwrap() < json.find("data-id").unwrap());

        let deserialized: ElementNode = serde_json::from_str(&json).unwrap();
        assert_eq!(element, deserialized);
    }
}
