use std::time::Duration;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};

/// Bumped whenever the payload layout changes; older entries read as absent.
pub const ENVELOPE_VERSION: u32 = 1;

/// On-disk wrapper around one persisted cache value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub version: u32,
    pub stored_at_ms: i64,
    /// CRC32 of `payload`.
    pub checksum: u32,
    /// LZ4 block with prepended size.
    pub payload: Vec<u8>,
}

impl PersistedEntry {
    /// Compress `raw` and stamp it with the current wall-clock time.
    pub fn seal(raw: &[u8]) -> Self {
        Self::seal_at(raw, Utc::now().timestamp_millis())
    }

    pub fn seal_at(raw: &[u8], stored_at_ms: i64) -> Self {
        let payload = lz4_flex::compress_prepend_size(raw);
        PersistedEntry {
            version: ENVELOPE_VERSION,
            stored_at_ms,
            checksum: crc32fast::hash(&payload),
            payload,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        let age_ms = Utc::now().timestamp_millis().saturating_sub(self.stored_at_ms);
        age_ms < 0 || age_ms as u128 >= ttl.as_millis()
    }

    /// Verify version and checksum, then decompress.
    pub fn open(&self) -> Result<Vec<u8>> {
        if self.version != ENVELOPE_VERSION {
            return Err(Error::new(
                ErrorKind::Storage,
                format!("unsupported envelope version {}", self.version),
            ));
        }
        if crc32fast::hash(&self.payload) != self.checksum {
            return Err(Error::new(ErrorKind::Storage, "checksum mismatch".to_string()));
        }
        Ok(lz4_flex::decompress_size_prepended(&self.payload)?)
    }
}
