//! Live-page selector capture over the Chrome DevTools Protocol

pub mod capture;
pub mod config;
pub mod session;

pub use capture::{Capture, CaptureHost, CaptureState, ClickCapture, ClickedElement, Highlight, PageHost};
pub use config::{ConnectionOptions, LaunchOptions};
pub use session::{normalize_url, BrowserSession};
