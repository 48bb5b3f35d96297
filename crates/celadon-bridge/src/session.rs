//! Content half of the bridge.
//!
//! A [`ContentSession`] is the capability handed to content-side code at
//! load time — one per window, never a process-wide global. It is
//! deliberately `!Send`: the content environment is single-threaded and
//! cooperative, and the handle's internals rely on that.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use celadon_common::{BridgeError, CorrelationId, WindowId};
use tracing::{debug, trace};

use crate::host::Bridge;
use crate::message::{response_channel, Delivery, Envelope};

type SubscriberFn = Rc<RefCell<dyn FnMut(&Delivery)>>;
type ReplyFn = Box<dyn FnOnce(&Delivery)>;

/// Handle returned by [`ContentSession::subscribe`]; pass it back to
/// [`ContentSession::unsubscribe`] to cancel the registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
    channel: String,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

/// Per-session bridge capability for content-side code.
pub struct ContentSession {
    bridge: Arc<Bridge>,
    id: WindowId,
    inbox: Arc<Mutex<VecDeque<Delivery>>>,
    subscriptions: RefCell<HashMap<String, Vec<(u64, SubscriberFn)>>>,
    /// One-shot reply callbacks keyed by correlation token.
    pending_replies: RefCell<HashMap<CorrelationId, ReplyFn>>,
    next_subscription: Cell<u64>,
}

impl ContentSession {
    pub(crate) fn new(
        bridge: Arc<Bridge>,
        id: WindowId,
        inbox: Arc<Mutex<VecDeque<Delivery>>>,
    ) -> Self {
        Self {
            bridge,
            id,
            inbox,
            subscriptions: RefCell::new(HashMap::new()),
            pending_replies: RefCell::new(HashMap::new()),
            next_subscription: Cell::new(0),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    // ==================== Sends ====================

    /// Fire-and-forget send to the host. Any handler return is discarded.
    pub fn notify(
        &self,
        channel: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<(), BridgeError> {
        let channel = channel.into();
        if channel.is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        self.bridge.ingest(
            self.id,
            Envelope::Notification {
                channel,
                payload: payload.into(),
            },
        );
        Ok(())
    }

    /// Send to the host expecting an out-of-band reply on the derived
    /// response channel.
    ///
    /// Never blocks. The reply is observed through a subscription on
    /// `channel + ":response"` held at the time the reply is dispatched —
    /// otherwise it is dropped (at-most-once, no queue, no replay).
    pub fn invoke(
        &self,
        channel: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<CorrelationId, BridgeError> {
        let channel = channel.into();
        if channel.is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        let correlation = CorrelationId::new();
        self.bridge.ingest(
            self.id,
            Envelope::Invocation {
                reply_channel: response_channel(&channel),
                channel,
                payload: payload.into(),
                correlation: correlation.clone(),
            },
        );
        Ok(correlation)
    }

    /// [`invoke`](Self::invoke), plus a one-shot callback fired when the
    /// reply carrying the matching correlation token arrives — regardless
    /// of channel subscriptions. This is the correlated alternative to the
    /// raw channel contract, which cannot attribute concurrent replies.
    pub fn invoke_with<F>(
        &self,
        channel: impl Into<String>,
        payload: impl Into<String>,
        on_reply: F,
    ) -> Result<CorrelationId, BridgeError>
    where
        F: FnOnce(&Delivery) + 'static,
    {
        let correlation = self.invoke(channel, payload)?;
        self.pending_replies
            .borrow_mut()
            .insert(correlation.clone(), Box::new(on_reply));
        Ok(correlation)
    }

    // ==================== Subscriptions ====================

    /// Register a callback for every message arriving on `channel`.
    ///
    /// All subscriptions on a channel fire on each message (broadcast,
    /// order unspecified). Valid until the session ends or the returned
    /// handle is cancelled.
    pub fn subscribe<F>(
        &self,
        channel: impl Into<String>,
        callback: F,
    ) -> Result<Subscription, BridgeError>
    where
        F: FnMut(&Delivery) + 'static,
    {
        let channel = channel.into();
        if channel.is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        self.subscriptions
            .borrow_mut()
            .entry(channel.clone())
            .or_default()
            .push((id, Rc::new(RefCell::new(callback))));
        trace!(session = %self.id, channel = %channel, "subscription registered");
        Ok(Subscription { id, channel })
    }

    /// Cancel a subscription. Takes effect for deliveries after the current
    /// scheduling turn. Returns whether the registration still existed.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        let Some(list) = subs.get_mut(&subscription.channel) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        let removed = list.len() != before;
        if list.is_empty() {
            subs.remove(&subscription.channel);
        }
        removed
    }

    pub fn subscription_count(&self, channel: &str) -> usize {
        self.subscriptions
            .borrow()
            .get(channel)
            .map_or(0, |list| list.len())
    }

    /// Number of correlated replies still outstanding.
    pub fn pending_reply_count(&self) -> usize {
        self.pending_replies.borrow().len()
    }

    // ==================== Scheduling turn ====================

    /// Run one content scheduling turn.
    ///
    /// Dequeues the deliveries pending at entry and runs their callbacks to
    /// completion, one delivery at a time. A delivery with no matching
    /// subscription (and no pending correlated reply) is dropped silently —
    /// at-most-once is the contract. Returns the number of deliveries
    /// processed.
    pub fn pump(&self) -> usize {
        let batch: Vec<Delivery> = {
            let mut inbox = self.inbox.lock().unwrap();
            inbox.drain(..).collect()
        };
        let count = batch.len();

        for delivery in batch {
            self.dispatch(&delivery);
        }

        count
    }

    fn dispatch(&self, delivery: &Delivery) {
        // Correlated one-shot first, so an invoke_with caller sees the reply
        // even with no channel subscription in place.
        if let Some(correlation) = &delivery.correlation {
            let pending = self.pending_replies.borrow_mut().remove(correlation);
            if let Some(on_reply) = pending {
                on_reply(delivery);
            }
        }

        // Snapshot the matching subscribers, then run them with the registry
        // unborrowed so callbacks may subscribe and unsubscribe freely.
        let subscribers: Vec<SubscriberFn> = self
            .subscriptions
            .borrow()
            .get(delivery.channel())
            .map(|list| list.iter().map(|(_, cb)| Rc::clone(cb)).collect())
            .unwrap_or_default();

        if subscribers.is_empty() && delivery.correlation.is_none() {
            debug!(session = %self.id, channel = %delivery.channel(), "delivery dropped: no subscription");
        }

        for callback in subscribers {
            (callback.borrow_mut())(delivery);
        }
    }
}

impl Drop for ContentSession {
    fn drop(&mut self) {
        self.bridge.release_session(self.id, &self.inbox);
    }
}
