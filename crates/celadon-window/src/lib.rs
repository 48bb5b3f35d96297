//! Window configuration and control surface.
//!
//! Windows are declared with a flat [`WindowOptions`] object applied
//! atomically at construction, then driven through fire-and-forget
//! [`WindowCommand`]s drained by the host loop. Window identity doubles as
//! the bridge session id.

pub mod command;
pub mod emitter;
pub mod events;
pub mod options;
pub mod registry;
pub mod window;

pub use command::WindowCommand;
pub use emitter::{EventEmitter, ListenerId};
pub use events::{FileDrop, PageLoadState, WindowEvent};
pub use options::{Backdrop, Rgba, Theme, WebViewSettings, WindowOptions};
pub use registry::WindowRegistry;
pub use window::Window;
