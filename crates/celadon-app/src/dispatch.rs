//! Built-in host handler for content-requested window actions.
//!
//! Content sends plain action names on [`WINDOW_ACTION_CHANNEL`]; the
//! handler queues them for the app loop, which applies them to the
//! originating window on its next turn. Handlers run on the bridge's host
//! turn and never touch window state directly.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use celadon_bridge::Bridge;
use celadon_common::{BridgeError, WindowId};
use tracing::warn;

/// Channel content-side code sends window actions on.
pub const WINDOW_ACTION_CHANNEL: &str = "window:action";

/// Window mutations content is allowed to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Close,
    Minimize,
    Maximize,
    Focus,
}

impl WindowAction {
    /// Parse an action payload. Anything not in the vocabulary is `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "close" => Some(Self::Close),
            "minimize" => Some(Self::Minimize),
            "maximize" => Some(Self::Maximize),
            "focus" => Some(Self::Focus),
            _ => None,
        }
    }
}

pub(crate) type ActionQueue = Arc<Mutex<VecDeque<(WindowId, WindowAction)>>>;

/// Register the `window:action` handler on `bridge`, feeding `queue`.
pub(crate) fn register_window_actions(
    bridge: &Bridge,
    queue: ActionQueue,
) -> Result<(), BridgeError> {
    bridge.on(WINDOW_ACTION_CHANNEL, move |session, payload| {
        match WindowAction::parse(payload) {
            Some(action) => {
                queue.lock().unwrap().push_back((session, action));
                Some(r#"{"success":true}"#.to_string())
            }
            None => {
                warn!(session = %session, payload, "window action rejected: unknown action");
                Some(r#"{"success":false}"#.to_string())
            }
        }
    })
}
