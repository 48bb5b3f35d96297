//! Application shell tying the bridge, windows, and content together.
//!
//! An [`App`] owns one [`celadon_bridge::Bridge`], the window registry,
//! and the application event bus, and drives their cooperative scheduling
//! turns from a single host loop.

pub mod app;
pub mod config;
pub mod dispatch;

pub use app::App;
pub use config::AppConfig;
pub use dispatch::{WindowAction, WINDOW_ACTION_CHANNEL};
