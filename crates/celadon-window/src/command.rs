//! Fire-and-forget commands against the host windowing layer.

use serde::{Deserialize, Serialize};

use crate::options::{Backdrop, Theme};

/// Every mutation a window handle can request after construction.
///
/// Commands carry no return contract; the host drains and applies them on
/// its own turn. Failures surface only at the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowCommand {
    SetTitle(String),
    SetSize { width: u32, height: u32 },
    SetMinSize { width: u32, height: u32 },
    SetMaxSize { width: u32, height: u32 },
    SetPosition { x: i32, y: i32 },
    SetVisible(bool),
    SetAlwaysOnTop(bool),
    SetResizable(bool),
    SetTheme(Theme),
    SetBackdrop(Backdrop),
    SetFullscreen(bool),
    Minimize,
    ToggleMaximize,
    Focus,
    LoadUrl(String),
    EvalScript(String),
    Close,
}
