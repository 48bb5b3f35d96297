//! Message bridge between the native host and embedded web content.
//!
//! Messages flow in both directions:
//! - **Content -> Host**: a session emits a tagged [`Envelope`] — either a
//!   fire-and-forget notification or an invocation expecting a reply on a
//!   derived response channel.
//! - **Host -> Content**: the host pushes a [`Delivery`] to one session,
//!   fanned out to every subscription registered on the channel.
//!
//! Both directions are queue-and-drain: a send never blocks and never runs
//! callbacks on the sender's stack. Each side observes traffic only on its
//! own `pump` turn, one message at a time, run to completion.

pub mod codec;
pub mod host;
pub mod inject;
pub mod message;
pub mod session;

pub use codec::{JsonCodec, PayloadCodec};
pub use host::Bridge;
pub use inject::{js_dispatch, BRIDGE_INIT_SCRIPT};
pub use message::{response_channel, Delivery, Envelope, Message};
pub use session::{ContentSession, Subscription};
