use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one window and, with it, one content session.
///
/// Subscriptions and in-flight invocations are scoped to the session
/// carrying this id; nothing outlives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl WindowId {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-invocation token carried on an invocation and echoed on its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh 8-hex-char token.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let bytes = uuid.as_bytes();
        Self(format!(
            "{:02x}{:02x}{:02x}{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CorrelationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_id_display() {
        let id = WindowId(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(id.as_u32(), 7);
    }

    #[test]
    fn window_id_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(WindowId(1));
        set.insert(WindowId(1));
        set.insert(WindowId(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn window_id_serialization() {
        let id = WindowId(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: WindowId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn correlation_id_length() {
        let cid = CorrelationId::new();
        assert_eq!(cid.as_str().len(), 8);
    }

    #[test]
    fn correlation_id_is_hex() {
        let cid = CorrelationId::new();
        assert!(cid.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn correlation_id_is_unique() {
        let a = CorrelationId::new();
        let b = CorrelationId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn correlation_id_display() {
        let cid = CorrelationId::new();
        assert_eq!(cid.to_string(), cid.as_str());
    }

    #[test]
    fn correlation_id_serializes_as_string() {
        let cid = CorrelationId::from("deadbeef".to_string());
        let json = serde_json::to_string(&cid).unwrap();
        assert_eq!(json, "\"deadbeef\"");
        let back: CorrelationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cid);
    }
}
