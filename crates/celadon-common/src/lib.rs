pub mod errors;
pub mod events;
pub mod id;

pub use errors::{BridgeError, CeladonError, ConfigError, ContentError, WindowError};
pub use events::{AppEvent, EventBus};
pub use id::{CorrelationId, WindowId};

pub type Result<T> = std::result::Result<T, CeladonError>;
