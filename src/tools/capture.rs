use crate::browser::{BrowserSession, ClickCapture, ConnectionOptions, Highlight, LaunchOptions, normalize_url};
use crate::error::Result;
use crate::jsonl;
use crate::record::AnnotatedRecord;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Delay between two polls of the page for a recorded click
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn default_highlight_ms() -> u64 {
    2000
}

/// Parameters for the capture tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CaptureParams {
    /// Page to open; a missing scheme defaults to https
    pub url: String,

    /// Append the captured `{html, selector}` pair to this JSONL file
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Give up when no click arrives within this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Run the browser without a window (only useful with a scripted click)
    #[serde(default)]
    pub headless: bool,

    /// How long the clicked element stays outlined
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,

    /// Attach to a running browser instead of launching one
    #[serde(default)]
    pub ws_url: Option<String>,
}

/// Tool opening a page and turning the user's next click into a selector
#[derive(Default)]
pub struct CaptureTool;

impl CaptureTool {
    fn open_session(params: &CaptureParams) -> Result<BrowserSession> {
        match &params.ws_url {
            Some(ws_url) => BrowserSession::connect(ConnectionOptions::new(ws_url.clone())),
            None => BrowserSession::launch(LaunchOptions::new().headless(params.headless)),
        }
    }
}

impl Tool for CaptureTool {
    type Params = CaptureParams;

    fn name(&self) -> &str {
        "capture"
    }

    fn execute_typed(&self, params: CaptureParams, _context: &mut ToolContext) -> Result<ToolResult> {
        let url = normalize_url(&params.url);
        let session = Self::open_session(&params)?;
        session.navigate(&url)?;
        log::info!("Opened {}; waiting for a click", url);

        let highlight = Highlight {
            duration: Duration::from_millis(params.highlight_ms),
            ..Highlight::default()
        };
        let mut capture = ClickCapture::new().with_highlight(highlight.clone());
        let captured = session.capture_click(&mut capture, POLL_INTERVAL, params.timeout_secs.map(Duration::from_secs))?;

        if let Some(output) = &params.output {
            let mut writer = jsonl::append_output(output)?;
            jsonl::write_record(&mut writer, &AnnotatedRecord::new(captured.html.clone(), captured.selector.clone()))?;
            std::io::Write::flush(&mut writer)?;
            log::info!("Appended capture to {}", output.display());
        }

        // let the outline play out before the tab goes away
        std::thread::sleep(highlight.duration);

        Ok(ToolResult::success_with(serde_json::to_value(&captured)?)
            .with_report(format!("Selector: {}", captured.selector)))
    }
}
