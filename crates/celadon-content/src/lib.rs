//! Local content serving for embedded web frontends.
//!
//! Bundled HTML/JS/CSS assets are served to content sessions through named
//! mounts under a custom URL scheme, so no local HTTP server is needed.

mod provider;

pub use provider::{ContentService, SCHEME};
