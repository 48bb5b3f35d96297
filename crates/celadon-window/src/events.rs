//! Window event types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

/// Files dropped onto a window, with the drop position.
///
/// Arrives from the host as JSON: `{"files": [...], "x": .., "y": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileDrop {
    pub files: Vec<String>,
    pub x: f64,
    pub y: f64,
}

impl FileDrop {
    /// Parse a drop payload. Malformed data degrades to an empty drop at
    /// the origin rather than failing the event.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(drop) => drop,
            Err(e) => {
                warn!(error = %e, "malformed file-drop payload");
                Self::default()
            }
        }
    }
}

/// Events observable on a window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    Created,
    /// The window is about to close.
    Close,
    Closed,
    Focused,
    Blurred,
    Resized { width: u32, height: u32 },
    Moved { x: i32, y: i32 },
    PageLoaded { url: String, state: PageLoadState },
    FileDrop(FileDrop),
    ThemeChanged { dark: bool },
}

impl WindowEvent {
    /// The public event name listeners register under.
    pub fn name(&self) -> &'static str {
        match self {
            WindowEvent::Created => "created",
            WindowEvent::Close => "close",
            WindowEvent::Closed => "closed",
            WindowEvent::Focused => "focus",
            WindowEvent::Blurred => "blur",
            WindowEvent::Resized { .. } => "resize",
            WindowEvent::Moved { .. } => "move",
            WindowEvent::PageLoaded { .. } => "page-loaded",
            WindowEvent::FileDrop(_) => "file-drop",
            WindowEvent::ThemeChanged { .. } => "theme-changed",
        }
    }
}
