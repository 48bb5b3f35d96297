use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use celadon_common::ContentError;
use tracing::{debug, warn};

/// URL scheme content sessions load bundled assets from.
pub const SCHEME: &str = "celadon";

/// Serves local files from named mount directories.
///
/// A request for `celadon://app/index.html` resolves against the directory
/// mounted as `app`. Directory requests fall back to `index.html`.
pub struct ContentService {
    mounts: HashMap<String, PathBuf>,
    /// In-memory overrides (for dynamically generated content).
    overrides: HashMap<String, (String, Vec<u8>)>, // path -> (mime, data)
}

impl ContentService {
    pub fn new() -> Self {
        Self {
            mounts: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// Mount `dir` under `name`. The directory must exist, and the name
    /// must be a single path segment.
    pub fn mount(
        &mut self,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Result<(), ContentError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(ContentError::InvalidMountName(name));
        }
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ContentError::MountNotFound(dir));
        }
        debug!(mount = %name, dir = %dir.display(), "content mount added");
        self.mounts.insert(name, dir);
        Ok(())
    }

    /// Register an in-memory asset override for a full request path
    /// (`mount/relative/path`).
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.overrides
            .insert(path.into(), (mime.into(), data.into()));
    }

    /// The base URL for a mount, e.g. `celadon://app`.
    pub fn mount_url(&self, name: &str) -> Option<String> {
        self.mounts.get(name).map(|_| format!("{SCHEME}://{name}"))
    }

    /// Resolve a request path to content bytes and MIME type.
    ///
    /// Missing assets, unknown mounts, and traversal attempts all resolve
    /// to `None`; none of them is an error at this layer.
    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = path.trim_start_matches('/');

        // Check overrides first
        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        let (mount, rest) = match clean.split_once('/') {
            Some((mount, rest)) => (mount, rest),
            None => (clean, ""),
        };
        let base = self.mounts.get(mount)?;

        // Directory requests fall back to the mount's index page.
        let rest = if rest.is_empty() || rest.ends_with('/') {
            Cow::Owned(format!("{rest}index.html"))
        } else {
            Cow::Borrowed(rest)
        };

        let file_path = base.join(rest.as_ref());

        // Prevent directory traversal (including symlink escape) by
        // canonicalizing both sides before comparing.
        let canonical_base = std::fs::canonicalize(base).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            warn!(path = %clean, "content request escaped its mount");
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        let mime = mime_from_extension(&file_path);
        Some((Cow::Owned(mime.to_string()), Cow::Owned(data)))
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.len()
    }
}

impl Default for ContentService {
    fn default() -> Self {
        Self::new()
    }
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        _ => "application/octet-stream",
    }
}
