//! Declarative window construction parameters.

use celadon_common::WindowError;
use serde::{Deserialize, Serialize};

/// Window theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Window backdrop material.
///
/// Backdrops are host-rendered translucency effects; the window must be
/// transparent for one to show through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    #[serde(rename = "mica")]
    Mica,
    #[serde(rename = "micaAlt")]
    MicaAlt,
    #[serde(rename = "acrylic")]
    Acrylic,
}

/// Window background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }
}

/// Embedded content settings, applied when the window's content loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebViewSettings {
    pub autoplay: bool,
    pub background_throttling: bool,
    pub disable_right_click: bool,
    pub user_agent: Option<String>,
    /// Script evaluated in the page before its own scripts run.
    pub preload_js: Option<String>,
}

/// Flat window parameter set.
///
/// Every field is independently optional with the documented default and
/// the whole set is applied atomically at window construction; afterwards
/// individual aspects change through `Window` setters.
///
/// Position `-1` on either axis means "center on screen"; size limits of
/// `0` mean "unlimited".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub resizable: bool,
    pub remove_titlebar: bool,
    pub transparent: bool,
    pub background_color: Rgba,
    pub always_on_top: bool,
    pub theme: Theme,
    pub backdrop: Option<Backdrop>,
    pub maximized: bool,
    pub maximizable: bool,
    pub minimizable: bool,
    pub fullscreen: bool,
    /// Focus the window when it is first shown.
    pub focus: bool,
    /// Create the window hidden; it appears on the first `show`.
    pub hidden: bool,
    /// Adopt the page favicon as the window icon.
    pub use_page_icon: bool,
    /// Initial URL to load.
    pub url: Option<String>,
    pub webview: WebViewSettings,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Window".into(),
            width: 800,
            height: 600,
            x: -1,
            y: -1,
            min_width: 0,
            min_height: 0,
            max_width: 0,
            max_height: 0,
            resizable: true,
            remove_titlebar: false,
            transparent: false,
            background_color: Rgba::default(),
            always_on_top: false,
            theme: Theme::System,
            backdrop: None,
            maximized: false,
            maximizable: true,
            minimizable: true,
            fullscreen: false,
            focus: true,
            hidden: false,
            use_page_icon: true,
            url: None,
            webview: WebViewSettings::default(),
        }
    }
}

impl WindowOptions {
    /// Options that load a URL, everything else defaulted.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Whether the window should be centered on screen at creation.
    pub fn is_centered(&self) -> bool {
        self.x == -1 && self.y == -1
    }

    /// Type/range validation. Applied before any window is constructed so
    /// an invalid set never reaches the host.
    pub fn validate(&self) -> Result<(), WindowError> {
        if self.width == 0 || self.height == 0 {
            return Err(WindowError::InvalidOptions(
                "width and height must be positive".into(),
            ));
        }
        if self.max_width != 0 && self.max_width < self.min_width {
            return Err(WindowError::InvalidOptions(format!(
                "max_width {} is below min_width {}",
                self.max_width, self.min_width
            )));
        }
        if self.max_height != 0 && self.max_height < self.min_height {
            return Err(WindowError::InvalidOptions(format!(
                "max_height {} is below min_height {}",
                self.max_height, self.min_height
            )));
        }
        if self.backdrop.is_some() && !self.transparent {
            return Err(WindowError::InvalidOptions(
                "backdrop materials require a transparent window".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
