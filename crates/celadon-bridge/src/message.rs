//! Wire types for bridge traffic.

use celadon_common::CorrelationId;
use serde::{Deserialize, Serialize};

/// Suffix appended to an invocation channel to derive its reply channel.
pub const RESPONSE_SUFFIX: &str = ":response";

/// Derive the reply channel for an invocation channel.
///
/// This helper is the single owner of the `":response"` convention;
/// nothing else in the crate builds reply channel names by hand.
pub fn response_channel(channel: &str) -> String {
    format!("{channel}{RESPONSE_SUFFIX}")
}

/// The unit of communication: a string-named topic and an opaque payload.
///
/// The payload is conventionally JSON but the bridge never interprets it;
/// interpretation belongs to a [`crate::codec::PayloadCodec`] at the edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub channel: String,
    pub payload: String,
}

impl Message {
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// Content -> host traffic.
///
/// Whether a reply is expected is a structural property of the envelope,
/// not something inferred from the channel name: an `Invocation` carries
/// its reply channel and a per-invocation correlation token, a
/// `Notification` carries neither.
///
/// The serialized form is the wire format content-side code posts through
/// the injected bridge object (see [`crate::inject`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Envelope {
    Notification {
        channel: String,
        payload: String,
    },
    #[serde(rename_all = "camelCase")]
    Invocation {
        channel: String,
        payload: String,
        reply_channel: String,
        correlation: CorrelationId,
    },
}

impl Envelope {
    /// Parse an envelope from the raw JSON posted by content-side code.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn channel(&self) -> &str {
        match self {
            Envelope::Notification { channel, .. } => channel,
            Envelope::Invocation { channel, .. } => channel,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            Envelope::Notification { payload, .. } => payload,
            Envelope::Invocation { payload, .. } => payload,
        }
    }
}

/// Host -> content message as observed by a subscriber.
///
/// `correlation` is set only on invocation replies; host-initiated pushes
/// carry `None`.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message: Message,
    pub correlation: Option<CorrelationId>,
}

impl Delivery {
    pub fn push(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            message: Message::new(channel, payload),
            correlation: None,
        }
    }

    pub fn reply(
        channel: impl Into<String>,
        payload: impl Into<String>,
        correlation: CorrelationId,
    ) -> Self {
        Self {
            message: Message::new(channel, payload),
            correlation: Some(correlation),
        }
    }

    pub fn channel(&self) -> &str {
        &self.message.channel
    }

    pub fn payload(&self) -> &str {
        &self.message.payload
    }
}
