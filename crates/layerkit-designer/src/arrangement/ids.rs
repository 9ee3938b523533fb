//! Time and identity sources for derived elements.
//!
//! Reconciliation stamps every derived element with a timestamp, a random
//! suffix and a version nonce. Both sources are traits so a pass can be made
//! deterministic.

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

/// Wall clock in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Source of random id suffixes and version nonces.
pub trait IdSource: Send + Sync {
    /// Nine lowercase alphanumeric characters.
    fn suffix(&self) -> String;
    /// Non-negative nonce below one million.
    fn nonce(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn suffix(&self) -> String {
        Uuid::new_v4().simple().to_string()[..9].to_string()
    }

    fn nonce(&self) -> i64 {
        (Uuid::new_v4().as_u128() % 1_000_000) as i64
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Counter-based ids: `000000001`, `000000002`, ...
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    next: Mutex<u64>,
}

impl SequentialIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        let mut next = self.next.lock();
        *next += 1;
        *next
    }
}

impl IdSource for SequentialIdSource {
    fn suffix(&self) -> String {
        format!("{:09}", self.bump() % 1_000_000_000)
    }

    fn nonce(&self) -> i64 {
        (self.bump() % 1_000_000) as i64
    }
}

/// `{original}_arranged_{timestamp}_{suffix}`
pub fn derived_id(original_id: &str, timestamp_ms: i64, suffix: &str) -> String {
    format!("{}_arranged_{}_{}", original_id, timestamp_ms, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_suffix_shape() {
        let s = UuidIdSource.suffix();
        assert_eq!(s.len(), 9);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!((0..1_000_000).contains(&UuidIdSource.nonce()));
    }

    #[test]
    fn test_sequential_ids_are_distinct() {
        let ids = SequentialIdSource::new();
        let a = ids.suffix();
        let b = ids.suffix();
        assert_ne!(a, b);
        assert_eq!(a, "000000001");
    }

    #[test]
    fn test_derived_id_format() {
        assert_eq!(derived_id("abc", 42, "xyz"), "abc_arranged_42_xyz");
    }
}
