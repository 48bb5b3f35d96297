//! Host half of the bridge.
//!
//! The [`Bridge`] owns the handler registry and the per-session delivery
//! queues. Content sessions feed envelopes into the host queue; the host
//! observes them on its own `pump` turn, runs handlers to completion, and
//! queues any replies back toward the originating session.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use celadon_common::{BridgeError, WindowId};
use tracing::debug;

use crate::message::{Delivery, Envelope};
use crate::session::ContentSession;

/// A host-side channel handler.
///
/// Invoked with the originating session id and the opaque payload. A `Some`
/// return on an invocation becomes the reply payload; on a notification it
/// is discarded.
pub type Handler = Arc<dyn Fn(WindowId, &str) -> Option<String> + Send + Sync>;

pub(crate) type Inbox = Arc<Mutex<VecDeque<Delivery>>>;

/// The message router connecting the host and its content sessions.
///
/// Thread-safe on the host side; hand out `Arc<Bridge>` freely. The content
/// side is reached only through [`ContentSession`] handles created by
/// [`Bridge::open_session`].
pub struct Bridge {
    handlers: Mutex<HashMap<String, Handler>>,
    inboxes: Mutex<HashMap<WindowId, Inbox>>,
    /// Content -> host envelopes awaiting the next host turn.
    outbox: Mutex<VecDeque<(WindowId, Envelope)>>,
}

impl Bridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: Mutex::new(HashMap::new()),
            inboxes: Mutex::new(HashMap::new()),
            outbox: Mutex::new(VecDeque::new()),
        })
    }

    // ==================== Handler registry ====================

    /// Register a handler for `channel`, replacing any previous one.
    pub fn on<F>(&self, channel: impl Into<String>, handler: F) -> Result<(), BridgeError>
    where
        F: Fn(WindowId, &str) -> Option<String> + Send + Sync + 'static,
    {
        let channel = channel.into();
        if channel.is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        let previous = self
            .handlers
            .lock()
            .unwrap()
            .insert(channel.clone(), Arc::new(handler));
        if previous.is_some() {
            debug!(channel = %channel, "handler replaced");
        }
        Ok(())
    }

    /// Remove the handler for `channel`. Returns whether one was registered.
    pub fn off(&self, channel: &str) -> bool {
        self.handlers.lock().unwrap().remove(channel).is_some()
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.handlers.lock().unwrap().contains_key(channel)
    }

    // ==================== Sessions ====================

    /// Open a content session for `id`.
    ///
    /// Reopening an id models a content reload: the previous session's
    /// queued deliveries and registrations are gone.
    pub fn open_session(self: &Arc<Self>, id: WindowId) -> Rc<ContentSession> {
        let inbox: Inbox = Arc::new(Mutex::new(VecDeque::new()));
        let previous = self
            .inboxes
            .lock()
            .unwrap()
            .insert(id, Arc::clone(&inbox));
        if previous.is_some() {
            debug!(session = %id, "session reopened, previous queue dropped");
        }
        Rc::new(ContentSession::new(Arc::clone(self), id, inbox))
    }

    /// Close a session, dropping any undelivered messages.
    pub fn close_session(&self, id: WindowId) -> bool {
        let removed = self.inboxes.lock().unwrap().remove(&id).is_some();
        if removed {
            debug!(session = %id, "session closed");
        }
        removed
    }

    /// Close a session only if `inbox` is still the one routed to.
    ///
    /// Used by a dropping session handle so a stale handle cannot tear
    /// down a session that was reopened after it.
    pub(crate) fn release_session(&self, id: WindowId, inbox: &Inbox) {
        let mut inboxes = self.inboxes.lock().unwrap();
        if let Some(current) = inboxes.get(&id) {
            if Arc::ptr_eq(current, inbox) {
                inboxes.remove(&id);
                debug!(session = %id, "session released");
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.inboxes.lock().unwrap().len()
    }

    // ==================== Host-initiated push ====================

    /// Push a message to one session.
    ///
    /// Unknown sessions and sessions with no matching subscription are a
    /// silent no-op at the protocol level.
    pub fn push(
        &self,
        id: WindowId,
        channel: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<(), BridgeError> {
        let channel = channel.into();
        if channel.is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        self.deliver(id, Delivery::push(channel, payload.into()));
        Ok(())
    }

    /// Queue a delivery toward a session's next pump turn.
    pub(crate) fn deliver(&self, id: WindowId, delivery: Delivery) {
        let inbox = self.inboxes.lock().unwrap().get(&id).cloned();
        match inbox {
            Some(inbox) => {
                inbox.lock().unwrap().push_back(delivery);
            }
            None => {
                debug!(session = %id, channel = %delivery.channel(), "delivery dropped: no such session");
            }
        }
    }

    // ==================== Inbound traffic ====================

    /// Accept a content -> host envelope for the next host turn.
    ///
    /// This is the raw entry point: session handles use it internally, and
    /// an embedder hosting a real webview feeds the parsed result of
    /// [`Envelope::from_json`] through it.
    pub fn ingest(&self, id: WindowId, envelope: Envelope) {
        self.outbox.lock().unwrap().push_back((id, envelope));
    }

    /// Run one host scheduling turn.
    ///
    /// Drains the envelopes queued at entry, invokes handlers to completion
    /// one at a time, and queues invocation replies. Envelopes queued by the
    /// handlers themselves wait for the next turn. Returns the number of
    /// envelopes processed.
    pub fn pump(&self) -> usize {
        let batch: Vec<(WindowId, Envelope)> = {
            let mut outbox = self.outbox.lock().unwrap();
            outbox.drain(..).collect()
        };
        let count = batch.len();

        for (session, envelope) in batch {
            // Clone the handler out so a handler is free to register or
            // remove handlers without deadlocking the registry.
            let handler = self.handlers.lock().unwrap().get(envelope.channel()).cloned();
            match envelope {
                Envelope::Notification { channel, payload } => match handler {
                    Some(h) => {
                        if h(session, &payload).is_some() {
                            debug!(session = %session, channel = %channel, "reply from notification handler discarded");
                        }
                    }
                    None => {
                        debug!(session = %session, channel = %channel, "notification unhandled");
                    }
                },
                Envelope::Invocation {
                    channel,
                    payload,
                    reply_channel,
                    correlation,
                } => match handler {
                    Some(h) => {
                        if let Some(reply) = h(session, &payload) {
                            self.deliver(session, Delivery::reply(reply_channel, reply, correlation));
                        } else {
                            // No reply: indistinguishable from a slow handler
                            // by design. The caller owns its timeout.
                            debug!(session = %session, channel = %channel, "invocation handler returned no reply");
                        }
                    }
                    None => {
                        debug!(session = %session, channel = %channel, "invocation unhandled, no reply will arrive");
                    }
                },
            }
        }

        count
    }

    /// Number of envelopes waiting for the next host turn.
    pub fn pending(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn on_rejects_empty_channel() {
        let bridge = Bridge::new();
        let err = bridge.on("", |_, _| None).unwrap_err();
        assert!(matches!(err, BridgeError::EmptyChannel));
    }

    #[test]
    fn push_rejects_empty_channel() {
        let bridge = Bridge::new();
        let err = bridge.push(WindowId(1), "", "x").unwrap_err();
        assert!(matches!(err, BridgeError::EmptyChannel));
    }

    #[test]
    fn handler_replacement() {
        let bridge = Bridge::new();
        bridge.on("c", |_, _| Some("first".into())).unwrap();
        bridge.on("c", |_, _| Some("second".into())).unwrap();
        assert!(bridge.has_handler("c"));

        let session = bridge.open_session(WindowId(1));
        session.invoke("c", "").unwrap();
        bridge.pump();

        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let seen2 = std::rc::Rc::clone(&seen);
        session
            .subscribe("c:response", move |d| {
                seen2.borrow_mut().push(d.payload().to_string());
            })
            .unwrap();
        session.pump();
        assert_eq!(seen.borrow().as_slice(), ["second"]);
    }

    #[test]
    fn off_removes_handler() {
        let bridge = Bridge::new();
        bridge.on("c", |_, _| None).unwrap();
        assert!(bridge.off("c"));
        assert!(!bridge.off("c"));
        assert!(!bridge.has_handler("c"));
    }

    #[test]
    fn unhandled_notification_is_noop() {
        let bridge = Bridge::new();
        let session = bridge.open_session(WindowId(1));
        session.notify("nobody:home", "payload").unwrap();
        assert_eq!(bridge.pump(), 1);
    }

    #[test]
    fn push_to_unknown_session_is_noop() {
        let bridge = Bridge::new();
        assert!(bridge.push(WindowId(99), "status", "x").is_ok());
    }

    #[test]
    fn close_session_drops_queued_deliveries() {
        let bridge = Bridge::new();
        let session = bridge.open_session(WindowId(1));
        let hits = std::rc::Rc::new(std::cell::Cell::new(0u32));
        let hits2 = std::rc::Rc::clone(&hits);
        session
            .subscribe("status", move |_| hits2.set(hits2.get() + 1))
            .unwrap();

        bridge.push(WindowId(1), "status", "a").unwrap();
        assert!(bridge.close_session(WindowId(1)));
        // The inbox Arc the session holds still has the message, but the
        // bridge no longer routes to it; a reopened session starts clean.
        let reopened = bridge.open_session(WindowId(1));
        bridge.push(WindowId(1), "status", "b").unwrap();
        assert_eq!(reopened.pump(), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn pump_is_snapshot_bounded() {
        let bridge = Bridge::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        bridge
            .on("echo", move |_, _| {
                calls2.fetch_add(1, Ordering::SeqCst);
                None
            })
            .unwrap();

        let session = bridge.open_session(WindowId(1));
        session.notify("echo", "1").unwrap();
        session.notify("echo", "2").unwrap();
        assert_eq!(bridge.pump(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Nothing new arrived; the next turn is empty.
        assert_eq!(bridge.pump(), 0);
    }

    #[test]
    fn handler_may_register_handlers_without_deadlock() {
        let bridge = Bridge::new();
        let bridge2 = Arc::clone(&bridge);
        bridge
            .on("bootstrap", move |_, _| {
                bridge2.on("late", |_, _| Some("ok".into())).unwrap();
                None
            })
            .unwrap();

        let session = bridge.open_session(WindowId(1));
        session.notify("bootstrap", "").unwrap();
        bridge.pump();
        assert!(bridge.has_handler("late"));
    }

    #[test]
    fn session_count_tracks_open_and_close() {
        let bridge = Bridge::new();
        let _a = bridge.open_session(WindowId(1));
        {
            let _b = bridge.open_session(WindowId(2));
            assert_eq!(bridge.session_count(), 2);
        }
        // Dropping a session handle closes it.
        assert_eq!(bridge.session_count(), 1);
    }
}
