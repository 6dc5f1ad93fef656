//! Store key codec.
//!
//! Keys are 12 bytes -- 4-byte big-endian unix seconds, 5 process-random
//! bytes, 3-byte counter -- carried everywhere else as 24-char hex
//! strings. Repositories validate caller-supplied identifiers with
//! [`validate`] before building any `_id` filter, so a malformed string is
//! rejected as a client error without ever reaching the store.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use rand::Rng;

use super::StoreError;

static PROCESS_RANDOM: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A store-assigned document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a fresh key.
    ///
    /// Within one process, keys are strictly increasing in hex order even
    /// inside the same second (the counter ticks per key).
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let secs = chrono::Utc::now().timestamp().max(0) as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(PROCESS_RANDOM.get_or_init(|| rand::rng().random()));
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse a 24-character hex key.
    pub fn parse_str(s: &str) -> Result<Self, StoreError> {
        if s.len() != 24 {
            return Err(StoreError::InvalidId(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| StoreError::InvalidId(s.to_string()))?;
        let mut arr = [0u8; 12];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Reject a malformed identifier before any store call is attempted.
pub fn validate(id: &str) -> Result<(), StoreError> {
    ObjectId::parse_str(id).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_hex() {
        let id = ObjectId::new();
        let hex = id.to_hex();
        assert_eq!(hex.len(), 24);
        assert_eq!(ObjectId::parse_str(&hex).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(ObjectId::parse_str("").is_err());
        assert!(ObjectId::parse_str("not-a-key").is_err());
        assert!(ObjectId::parse_str("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(ObjectId::parse_str("0123456789abcdef01234567ff").is_err());
    }

    #[test]
    fn keys_increase_within_a_process() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert!(a.to_hex() < b.to_hex());
    }
}
