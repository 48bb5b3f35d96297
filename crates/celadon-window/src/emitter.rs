//! Named-event emitter for window events.
//!
//! Listeners register under an event name and all fire on emit (broadcast,
//! registration order). `once` listeners are removed after their first
//! fire. Runs on the host UI thread; not `Send` by design.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::events::WindowEvent;

type ListenerFn = Rc<RefCell<dyn FnMut(&WindowEvent)>>;

/// Handle identifying one registered listener, for targeted removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    once: bool,
    callback: ListenerFn,
}

#[derive(Default)]
pub struct EventEmitter {
    listeners: RefCell<HashMap<String, Vec<Entry>>>,
    next_id: Cell<u64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`. Returns its removal handle.
    pub fn on<F>(&self, event: impl Into<String>, callback: F) -> ListenerId
    where
        F: FnMut(&WindowEvent) + 'static,
    {
        self.register(event.into(), callback, false)
    }

    /// Register a listener removed after its first fire.
    pub fn once<F>(&self, event: impl Into<String>, callback: F) -> ListenerId
    where
        F: FnMut(&WindowEvent) + 'static,
    {
        self.register(event.into(), callback, true)
    }

    fn register<F>(&self, event: String, callback: F, once: bool) -> ListenerId
    where
        F: FnMut(&WindowEvent) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        trace!(event = %event, once, "listener registered");
        self.listeners.borrow_mut().entry(event).or_default().push(Entry {
            id,
            once,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Remove one listener by handle. Returns whether it was registered.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|entry| entry.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    /// Remove every listener for `event`.
    pub fn remove_all(&self, event: &str) {
        self.listeners.borrow_mut().remove(event);
    }

    /// Emit an event to every listener registered under its name.
    ///
    /// Returns whether any listener fired. Listeners registered by a
    /// running callback are not part of the current broadcast.
    pub fn emit(&self, event: &WindowEvent) -> bool {
        let name = event.name();

        // Snapshot, then drop the registry borrow so callbacks may
        // register and remove listeners freely.
        let snapshot: Vec<(ListenerId, bool, ListenerFn)> = self
            .listeners
            .borrow()
            .get(name)
            .map(|list| {
                list.iter()
                    .map(|e| (e.id, e.once, Rc::clone(&e.callback)))
                    .collect()
            })
            .unwrap_or_default();

        if snapshot.is_empty() {
            return false;
        }

        for (id, once, callback) in &snapshot {
            (callback.borrow_mut())(event);
            if *once {
                self.off(name, *id);
            }
        }
        true
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .get(event)
            .map_or(0, |list| list.len())
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Event names with at least one listener.
    pub fn event_names(&self) -> Vec<String> {
        self.listeners.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FileDrop;

    #[test]
    fn on_and_emit() {
        let emitter = EventEmitter::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits2 = Rc::clone(&hits);
        emitter.on("focus", move |_| hits2.set(hits2.get() + 1));

        assert!(emitter.emit(&WindowEvent::Focused));
        assert!(emitter.emit(&WindowEvent::Focused));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn emit_without_listeners_returns_false() {
        let emitter = EventEmitter::new();
        assert!(!emitter.emit(&WindowEvent::Blurred));
    }

    #[test]
    fn broadcast_to_all_listeners() {
        let emitter = EventEmitter::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order2 = Rc::clone(&order);
            emitter.on("closed", move |_| order2.borrow_mut().push(tag));
        }

        emitter.emit(&WindowEvent::Closed);
        assert_eq!(order.borrow().as_slice(), ["first", "second", "third"]);
    }

    #[test]
    fn once_listener_fires_exactly_once() {
        let emitter = EventEmitter::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits2 = Rc::clone(&hits);
        emitter.once("resize", move |_| hits2.set(hits2.get() + 1));

        let event = WindowEvent::Resized {
            width: 640,
            height: 480,
        };
        emitter.emit(&event);
        emitter.emit(&event);
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count("resize"), 0);
    }

    #[test]
    fn off_removes_one_listener() {
        let emitter = EventEmitter::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits2 = Rc::clone(&hits);
        let doomed = emitter.on("move", |_| {});
        emitter.on("move", move |_| hits2.set(hits2.get() + 1));

        assert!(emitter.off("move", doomed));
        assert!(!emitter.off("move", doomed));

        emitter.emit(&WindowEvent::Moved { x: 10, y: 10 });
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count("move"), 1);
    }

    #[test]
    fn remove_all_clears_event() {
        let emitter = EventEmitter::new();
        emitter.on("blur", |_| {});
        emitter.on("blur", |_| {});
        assert!(emitter.has_listeners("blur"));

        emitter.remove_all("blur");
        assert!(!emitter.has_listeners("blur"));
    }

    #[test]
    fn event_names_lists_registered_events() {
        let emitter = EventEmitter::new();
        emitter.on("focus", |_| {});
        emitter.on("file-drop", |_| {});

        let mut names = emitter.event_names();
        names.sort();
        assert_eq!(names, ["file-drop", "focus"]);
    }

    #[test]
    fn listener_receives_event_data() {
        let emitter = EventEmitter::new();
        let seen = Rc::new(RefCell::new(None));
        let seen2 = Rc::clone(&seen);
        emitter.on("file-drop", move |event| {
            if let WindowEvent::FileDrop(drop) = event {
                *seen2.borrow_mut() = Some(drop.files.clone());
            }
        });

        emitter.emit(&WindowEvent::FileDrop(FileDrop {
            files: vec!["/tmp/a".into()],
            x: 1.0,
            y: 2.0,
        }));
        assert_eq!(seen.borrow().as_deref(), Some(&["/tmp/a".to_string()][..]));
    }

    #[test]
    fn listener_registered_during_emit_waits_for_next_emit() {
        let emitter = Rc::new(EventEmitter::new());
        let late = Rc::new(Cell::new(0u32));
        let late2 = Rc::clone(&late);
        let weak = Rc::downgrade(&emitter);
        emitter.on("focus", move |_| {
            if let Some(emitter) = weak.upgrade() {
                let late3 = Rc::clone(&late2);
                emitter.once("focus", move |_| late3.set(late3.get() + 1));
            }
        });

        emitter.emit(&WindowEvent::Focused);
        assert_eq!(late.get(), 0);
        emitter.emit(&WindowEvent::Focused);
        assert_eq!(late.get(), 1);
    }
}
