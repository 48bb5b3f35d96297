//! Per-window handle.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use celadon_common::{WindowError, WindowId};
use tracing::debug;

use crate::command::WindowCommand;
use crate::emitter::EventEmitter;
use crate::events::{FileDrop, WindowEvent};
use crate::options::{Backdrop, Theme, WindowOptions};

pub(crate) type CommandSink = Rc<RefCell<VecDeque<(WindowId, WindowCommand)>>>;

/// Handle to one window.
///
/// Construction applies the full [`WindowOptions`] set atomically; after
/// that, every setter is a fire-and-forget [`WindowCommand`] queued for the
/// host loop, with local state tracking the last commanded value.
pub struct Window {
    id: WindowId,
    options: WindowOptions,
    commands: CommandSink,
    events: EventEmitter,
    open: bool,
    visible: bool,
    maximized: bool,
    minimized: bool,
    focused: bool,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("open", &self.open)
            .field("visible", &self.visible)
            .field("maximized", &self.maximized)
            .field("minimized", &self.minimized)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        options: WindowOptions,
        commands: CommandSink,
    ) -> Result<Self, WindowError> {
        options.validate()?;
        let visible = !options.hidden;
        let maximized = options.maximized;
        let focused = options.focus && visible;
        Ok(Self {
            id,
            options,
            commands,
            events: EventEmitter::new(),
            open: true,
            visible,
            maximized,
            minimized: false,
            focused,
        })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Event listener registration surface.
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// The options as constructed, updated by setters.
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    fn command(&self, command: WindowCommand) -> Result<(), WindowError> {
        if !self.open {
            return Err(WindowError::Closed);
        }
        self.commands.borrow_mut().push_back((self.id, command));
        Ok(())
    }

    // ==================== Lifecycle ====================

    pub fn show(&mut self) -> Result<(), WindowError> {
        self.visible = true;
        self.command(WindowCommand::SetVisible(true))
    }

    pub fn hide(&mut self) -> Result<(), WindowError> {
        self.visible = false;
        self.command(WindowCommand::SetVisible(false))
    }

    /// Request close. Emits `close` before the command is queued and
    /// `closed` once the handle considers itself gone.
    pub fn close(&mut self) -> Result<(), WindowError> {
        self.events.emit(&WindowEvent::Close);
        self.command(WindowCommand::Close)?;
        self.open = false;
        self.events.emit(&WindowEvent::Closed);
        debug!(window = %self.id, "window closed");
        Ok(())
    }

    pub fn focus(&mut self) -> Result<(), WindowError> {
        self.focused = true;
        self.command(WindowCommand::Focus)
    }

    // ==================== State ====================

    pub fn minimize(&mut self) -> Result<(), WindowError> {
        self.minimized = true;
        self.command(WindowCommand::Minimize)
    }

    /// Toggle maximize/restore.
    pub fn maximize(&mut self) -> Result<(), WindowError> {
        self.maximized = !self.maximized;
        self.command(WindowCommand::ToggleMaximize)
    }

    /// Restore from the maximized state; a no-op otherwise.
    pub fn restore(&mut self) -> Result<(), WindowError> {
        if self.maximized {
            self.maximized = false;
            self.command(WindowCommand::ToggleMaximize)?;
        }
        Ok(())
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), WindowError> {
        self.options.fullscreen = fullscreen;
        self.command(WindowCommand::SetFullscreen(fullscreen))
    }

    pub fn toggle_fullscreen(&mut self) -> Result<(), WindowError> {
        self.set_fullscreen(!self.options.fullscreen)
    }

    // ==================== Properties ====================

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), WindowError> {
        let title = title.into();
        self.options.title = title.clone();
        self.command(WindowCommand::SetTitle(title))
    }

    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), WindowError> {
        if width == 0 || height == 0 {
            return Err(WindowError::InvalidOptions(
                "width and height must be positive".into(),
            ));
        }
        self.options.width = width;
        self.options.height = height;
        self.command(WindowCommand::SetSize { width, height })
    }

    pub fn set_min_size(&mut self, width: u32, height: u32) -> Result<(), WindowError> {
        self.options.min_width = width;
        self.options.min_height = height;
        self.command(WindowCommand::SetMinSize { width, height })
    }

    pub fn set_max_size(&mut self, width: u32, height: u32) -> Result<(), WindowError> {
        self.options.max_width = width;
        self.options.max_height = height;
        self.command(WindowCommand::SetMaxSize { width, height })
    }

    pub fn set_position(&mut self, x: i32, y: i32) -> Result<(), WindowError> {
        self.options.x = x;
        self.options.y = y;
        self.command(WindowCommand::SetPosition { x, y })
    }

    /// Center the window on screen.
    pub fn center(&mut self) -> Result<(), WindowError> {
        self.set_position(-1, -1)
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<(), WindowError> {
        self.visible = visible;
        self.command(WindowCommand::SetVisible(visible))
    }

    pub fn set_always_on_top(&mut self, on_top: bool) -> Result<(), WindowError> {
        self.options.always_on_top = on_top;
        self.command(WindowCommand::SetAlwaysOnTop(on_top))
    }

    pub fn set_resizable(&mut self, resizable: bool) -> Result<(), WindowError> {
        self.options.resizable = resizable;
        self.command(WindowCommand::SetResizable(resizable))
    }

    // ==================== Appearance ====================

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), WindowError> {
        self.options.theme = theme;
        self.command(WindowCommand::SetTheme(theme))
    }

    /// Set the backdrop material. The window must be transparent.
    pub fn set_backdrop(&mut self, backdrop: Backdrop) -> Result<(), WindowError> {
        if !self.options.transparent {
            return Err(WindowError::InvalidOptions(
                "backdrop materials require a transparent window".into(),
            ));
        }
        self.options.backdrop = Some(backdrop);
        self.command(WindowCommand::SetBackdrop(backdrop))
    }

    // ==================== Content ====================

    pub fn load_url(&mut self, url: impl Into<String>) -> Result<(), WindowError> {
        let url = url.into();
        self.options.url = Some(url.clone());
        self.command(WindowCommand::LoadUrl(url))
    }

    /// Evaluate a script in the window's content.
    pub fn eval_script(&mut self, script: impl Into<String>) -> Result<(), WindowError> {
        self.command(WindowCommand::EvalScript(script.into()))
    }

    // ==================== Host events ====================

    /// Apply a host-reported event: update tracked state, then broadcast
    /// to listeners.
    pub fn handle_event(&mut self, event: WindowEvent) {
        match &event {
            WindowEvent::Resized { width, height } => {
                self.options.width = *width;
                self.options.height = *height;
            }
            WindowEvent::Moved { x, y } => {
                self.options.x = *x;
                self.options.y = *y;
            }
            WindowEvent::Focused => self.focused = true,
            WindowEvent::Blurred => self.focused = false,
            WindowEvent::Closed => self.open = false,
            _ => {}
        }
        self.events.emit(&event);
    }

    /// Parse and broadcast a file-drop payload from the host.
    pub fn handle_file_drop(&mut self, raw: &str) {
        self.handle_event(WindowEvent::FileDrop(FileDrop::from_json(raw)));
    }

    // ==================== Queries ====================

    pub fn title(&self) -> &str {
        &self.options.title
    }

    pub fn size(&self) -> (u32, u32) {
        (self.options.width, self.options.height)
    }

    pub fn position(&self) -> (i32, i32) {
        (self.options.x, self.options.y)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_fullscreen(&self) -> bool {
        self.options.fullscreen
    }
}
