//! Interactive selector capture
//!
//! [`ClickCapture`] is the two-state machine (armed, then fired once) that turns a
//! clicked element into a selector. Side effects go through [`CaptureHost`], so the
//! machine itself never touches a browser. [`BrowserSession::capture_click`] is the
//! shim that binds it to a live page: the page reports the clicked element's live
//! ancestor chain and the selector is built from that chain.

use crate::browser::session::BrowserSession;
use crate::dom::ElementNode;
use crate::error::{DatasetError, Result};
use crate::selector::{PathSegment, element_path, selector_from_path};
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Outline applied to the clicked element after a capture
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// CSS `outline` value
    pub outline: String,
    /// How long the outline stays before it is removed
    pub duration: Duration,
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            outline: "2px solid red".to_string(),
            duration: Duration::from_millis(2000),
        }
    }
}

/// Side effects performed when a capture fires
pub trait CaptureHost {
    /// Surface the selector to the user
    fn report(&mut self, selector: &str);

    /// Copy the selector to a clipboard; failures are tolerated by the caller
    fn write_clipboard(&mut self, text: &str) -> Result<()>;

    /// Outline the clicked element for `highlight.duration`
    fn highlight(&mut self, highlight: &Highlight) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Waiting for the next click
    Armed,
    /// A click was handled; further clicks are ignored
    Fired,
}

/// An element reported by a click
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickedElement {
    /// Ancestor-or-self chain as it stood in the page, root first
    pub path: Vec<PathSegment>,

    /// Outer markup
    pub html: String,

    pub element: ElementNode,
}

impl ClickedElement {
    /// Describe an element of a parsed document
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            path: element_path(element),
            html: element.html(),
            element: ElementNode::from_element(element),
        }
    }
}

/// Result of a fired capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub selector: String,

    /// Outer markup of the clicked element
    pub html: String,

    pub element: ElementNode,
}

/// One-shot click handler
#[derive(Debug, Clone)]
pub struct ClickCapture {
    state: CaptureState,
    highlight: Highlight,
}

impl Default for ClickCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickCapture {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Armed,
            highlight: Highlight::default(),
        }
    }

    /// Builder method: set the highlight applied on capture
    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == CaptureState::Armed
    }

    /// Handle a click on `target`. Only the first call produces a capture.
    pub fn on_click<H: CaptureHost>(&mut self, target: &ClickedElement, host: &mut H) -> Option<Capture> {
        if self.state == CaptureState::Fired {
            log::debug!("capture already fired, ignoring click");
            return None;
        }
        self.state = CaptureState::Fired;

        let selector = selector_from_path(&target.path);
        host.report(&selector);

        if let Err(e) = host.write_clipboard(&selector) {
            log::warn!("Unable to copy to clipboard: {}", e);
        }
        if let Err(e) = host.highlight(&self.highlight) {
            log::warn!("Unable to highlight element: {}", e);
        }

        Some(Capture {
            selector,
            html: target.html.clone(),
            element: target.element.clone(),
        })
    }
}

/// Click recorded by the in-page listener; `element` is null when the target was not an element
#[derive(Debug, Clone, Deserialize)]
struct ClickRecord {
    path: Vec<PathSegment>,
    html: String,
    element: Option<ElementNode>,
}

impl TryFrom<ClickRecord> for ClickedElement {
    type Error = DatasetError;

    fn try_from(record: ClickRecord) -> Result<Self> {
        match record.element {
            Some(element) if !record.path.is_empty() => Ok(Self {
                path: record.path,
                html: record.html,
                element,
            }),
            _ => Err(DatasetError::ElementNotFound("click did not land on an element".to_string())),
        }
    }
}

const ARM_JS: &str = include_str!("capture.js");

const POLL_JS: &str = r#"
    (function() {
        var state = window.__selectorCapture;
        return state && state.record ? JSON.stringify(state.record) : null;
    })()
"#;

/// [`CaptureHost`] backed by the page the click happened in
pub struct PageHost<'a> {
    session: &'a BrowserSession,
}

/// Page-console statement for a captured selector; the terminal line comes from the tool report
fn console_report(selector: &str) -> serde_json::Result<String> {
    Ok(format!("console.log('Selector:', {})", serde_json::to_string(selector)?))
}

impl<'a> PageHost<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }
}

impl CaptureHost for PageHost<'_> {
    fn report(&mut self, selector: &str) {
        let Ok(js) = console_report(selector) else {
            return;
        };
        if let Err(e) = self.session.evaluate(&js, false) {
            log::debug!("console report failed: {}", e);
        }
    }

    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        let literal = serde_json::to_string(text)?;
        let js = format!(
            "navigator.clipboard.writeText({}).then(function() {{ return true; }}, function() {{ return false; }})",
            literal
        );
        match self.session.evaluate(&js, true)? {
            Some(serde_json::Value::Bool(true)) => {
                log::info!("Copied to clipboard");
                Ok(())
            }
            _ => Err(DatasetError::EvaluationFailed("clipboard write rejected".to_string())),
        }
    }

    fn highlight(&mut self, highlight: &Highlight) -> Result<()> {
        let outline = serde_json::to_string(&highlight.outline)?;
        let js = format!(
            r#"(function() {{
                var el = window.__selectorCapture && window.__selectorCapture.target;
                if (!el) {{ return false; }}
                el.style.outline = {outline};
                setTimeout(function() {{ el.style.outline = ''; }}, {ms});
                return true;
            }})()"#,
            outline = outline,
            ms = highlight.duration.as_millis()
        );
        match self.session.evaluate(&js, false)? {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            _ => Err(DatasetError::ElementNotFound("clicked element is gone".to_string())),
        }
    }
}

impl BrowserSession {
    /// Install the click listener in the current page
    pub fn arm_capture(&self) -> Result<()> {
        self.evaluate(ARM_JS, false)?;
        Ok(())
    }

    fn poll_click(&self) -> Result<Option<ClickRecord>> {
        match self.evaluate(POLL_JS, false)? {
            Some(serde_json::Value::String(json)) => Ok(Some(serde_json::from_str(&json)?)),
            _ => Ok(None),
        }
    }

    /// Wait for the next click in the page and run it through `capture`
    pub fn capture_click(
        &self,
        capture: &mut ClickCapture,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<Capture> {
        self.arm_capture()?;
        let started = Instant::now();

        let record = loop {
            if let Some(record) = self.poll_click()? {
                break record;
            }
            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    return Err(DatasetError::CaptureTimeout(limit.as_secs()));
                }
            }
            std::thread::sleep(poll_interval);
        };

        let target = ClickedElement::try_from(record)?;

        let mut host = PageHost::new(self);
        capture
            .on_click(&target, &mut host)
            .ok_or_else(|| DatasetError::ToolExecutionFailed {
                tool: "capture".to_string(),
                reason: "capture already fired".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[derive(Default)]
    struct RecordingHost {
        reported: Vec<String>,
        clipboard: Vec<String>,
        highlights: Vec<Highlight>,
        clipboard_fails: bool,
    }

    impl CaptureHost for RecordingHost {
        fn report(&mut self, selector: &str) {
            self.reported.push(selector.to_string());
        }

        fn write_clipboard(&mut self, text: &str) -> Result<()> {
            if self.clipboard_fails {
                return Err(DatasetError::EvaluationFailed("denied".to_string()));
            }
            self.clipboard.push(text.to_string());
            Ok(())
        }

        fn highlight(&mut self, highlight: &Highlight) -> Result<()> {
            self.highlights.push(highlight.clone());
            Ok(())
        }
    }

    fn page() -> Html {
        Html::parse_document(r#"<nav><a href="/">Home</a><a class="cta" href="/go">Go</a></nav><p id="note">n</p>"#)
    }

    fn clicked(doc: &Html, css: &str) -> ClickedElement {
        ClickedElement::from_element(doc.select(&Selector::parse(css).unwrap()).next().unwrap())
    }

    #[test]
    fn test_first_click_fires() {
        let doc = page();
        let mut capture = ClickCapture::new();
        let mut host = RecordingHost::default();
        assert!(capture.is_armed());

        let result = capture.on_click(&clicked(&doc, "a.cta"), &mut host).unwrap();

        let expected = "html:nth-of-type(1) > body:nth-of-type(1) > nav:nth-of-type(1) > a.cta:nth-of-type(2)";
        assert_eq!(result.selector, expected);
        assert_eq!(result.html, r#"<a class="cta" href="/go">Go</a>"#);
        assert_eq!(result.element.tag_name, "a");
        assert_eq!(host.reported, vec![expected]);
        assert_eq!(host.clipboard, vec![expected]);
        assert_eq!(host.highlights, vec![Highlight::default()]);
        assert_eq!(capture.state(), CaptureState::Fired);
    }

    #[test]
    fn test_later_clicks_are_ignored() {
        let doc = page();
        let mut capture = ClickCapture::new();
        let mut host = RecordingHost::default();

        assert!(capture.on_click(&clicked(&doc, "#note"), &mut host).is_some());
        assert!(capture.on_click(&clicked(&doc, "a"), &mut host).is_none());
        assert_eq!(host.reported, vec!["#note"]);
        assert_eq!(host.highlights.len(), 1);
    }

    #[test]
    fn test_clipboard_failure_is_not_fatal() {
        let doc = page();
        let mut capture = ClickCapture::new();
        let mut host = RecordingHost {
            clipboard_fails: true,
            ..Default::default()
        };

        let result = capture.on_click(&clicked(&doc, "#note"), &mut host).unwrap();
        assert_eq!(result.selector, "#note");
        assert!(host.clipboard.is_empty());
        assert_eq!(host.highlights.len(), 1);
    }

    #[test]
    fn test_custom_highlight() {
        let doc = page();
        let highlight = Highlight {
            outline: "3px dashed blue".to_string(),
            duration: Duration::from_millis(500),
        };
        let mut capture = ClickCapture::new().with_highlight(highlight.clone());
        let mut host = RecordingHost::default();

        capture.on_click(&clicked(&doc, "#note"), &mut host);
        assert_eq!(host.highlights, vec![highlight]);
    }

    #[test]
    fn test_script_built_table_uses_live_chain() {
        // rows appended with appendChild: the live table has no tbody
        let record: ClickRecord = serde_json::from_str(
            r#"{
                "path": [
                    {"tag": "html", "id": null, "classes": [], "nth_of_type": 1},
                    {"tag": "body", "id": null, "classes": [], "nth_of_type": 1},
                    {"tag": "table", "id": null, "classes": [], "nth_of_type": 1},
                    {"tag": "tr", "id": null, "classes": [], "nth_of_type": 1},
                    {"tag": "td", "id": null, "classes": [], "nth_of_type": 2}
                ],
                "html": "<td>r1c2</td>",
                "element": {"tag_name": "td", "attributes": {}, "text_content": "r1c2"}
            }"#,
        )
        .unwrap();
        let target = ClickedElement::try_from(record).unwrap();
        let mut capture = ClickCapture::new();
        let mut host = RecordingHost::default();

        let result = capture.on_click(&target, &mut host).unwrap();
        assert_eq!(
            result.selector,
            "html:nth-of-type(1) > body:nth-of-type(1) > table:nth-of-type(1) > tr:nth-of-type(1) > td:nth-of-type(2)"
        );
        assert_eq!(result.html, "<td>r1c2</td>");
        assert_eq!(result.element.text_content.as_deref(), Some("r1c2"));
    }

    #[test]
    fn test_click_outside_elements_is_rejected() {
        let record: ClickRecord = serde_json::from_str(r#"{"path": [], "html": "", "element": null}"#).unwrap();
        assert!(matches!(ClickedElement::try_from(record), Err(DatasetError::ElementNotFound(_))));
    }

    #[test]
    fn test_console_report_quotes_selector() {
        assert_eq!(
            console_report(r#"a[href="x"] > 'b'"#).unwrap(),
            r#"console.log('Selector:', "a[href=\"x\"] > 'b'")"#
        );
    }
}
