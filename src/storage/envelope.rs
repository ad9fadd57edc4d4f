//! The `{data, timestamp, version}` wrapper around every persisted value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::now_millis;

/// Envelope format version written by this crate.
pub const ENVELOPE_VERSION: &str = "1.0";

/// A persisted value with its write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    pub data: T,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub version: String,
}

impl<T> StoredRecord<T> {
    /// Wraps `data`, stamped with the current time.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: now_millis(),
            version: ENVELOPE_VERSION.to_string(),
        }
    }
}

/// Age of a record written at `timestamp`, measured at `now` (both epoch ms).
#[must_use]
pub fn record_age(timestamp: u64, now: u64) -> Duration {
    Duration::from_millis(now.saturating_sub(timestamp))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_shape() {
        let record = StoredRecord::new(serde_json::json!({ "a": 1 }));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["data"]["a"], 1);
        assert_eq!(json["version"], "1.0");
        assert!(json["timestamp"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_record_age_saturates() {
        assert_eq!(record_age(1_000, 3_000), Duration::from_secs(2));
        assert_eq!(record_age(5_000, 3_000), Duration::ZERO);
    }
}
