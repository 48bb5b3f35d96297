//! Window registry and command drain.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use celadon_common::{WindowError, WindowId};
use tracing::debug;

use crate::command::WindowCommand;
use crate::options::WindowOptions;
use crate::window::{CommandSink, Window};

/// Owns every live window and the shared command queue their setters
/// feed. The host loop drains the queue once per turn.
pub struct WindowRegistry {
    windows: HashMap<WindowId, Window>,
    commands: CommandSink,
    next_id: u32,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            commands: Rc::new(RefCell::new(VecDeque::new())),
            next_id: 1,
        }
    }

    /// Create a window from `options`, applied atomically.
    pub fn create(&mut self, options: WindowOptions) -> Result<WindowId, WindowError> {
        let id = WindowId(self.next_id);
        let window = Window::new(id, options, Rc::clone(&self.commands))?;
        self.next_id += 1;
        debug!(window = %id, title = %window.title(), "window created");
        self.windows.insert(id, window);
        Ok(id)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    /// Close a window and drop it from the registry.
    pub fn close(&mut self, id: WindowId) -> bool {
        match self.windows.get_mut(&id) {
            Some(window) => {
                if window.is_open() {
                    // Close failures cannot happen on an open window; the
                    // command sink is unbounded.
                    let _ = window.close();
                }
                self.windows.remove(&id);
                debug!(window = %id, "window removed from registry");
                true
            }
            None => false,
        }
    }

    /// Close every window. Used during shutdown.
    pub fn close_all(&mut self) {
        let ids: Vec<WindowId> = self.ids();
        for id in ids {
            self.close(id);
        }
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Drain all queued window commands for the host loop.
    pub fn drain_commands(&self) -> Vec<(WindowId, WindowCommand)> {
        self.commands.borrow_mut().drain(..).collect()
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
