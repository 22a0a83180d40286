use std::sync::Mutex;
use std::time::SystemTime;
use crate::record::PingRecord;

/// Shared state cell between the poller (single writer) and the UI (reader).
///
/// Every poll cycle obtains a number from `begin_cycle` before its request
/// goes out and publishes under that number afterwards. Publishing replaces
/// the whole record set; a publish whose cycle number is not newer than the
/// last accepted one is discarded, so a slow response from an earlier cycle
/// can never overwrite data from a later one. Cycle numbers stay monotonic
/// across poller restarts because the counter lives here, not in the poller.
pub struct RecordStore {
    inner: Mutex<Inner>,
}

struct Inner {
    records: Vec<PingRecord>,
    issued_cycle: u64,
    published_cycle: u64,
    updated_at: Option<SystemTime>,
}

/// Read-only view of the store taken by the UI once per frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Vec<PingRecord>,
    pub updated_at: Option<SystemTime>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: Vec::new(),
                issued_cycle: 0,
                published_cycle: 0,
                updated_at: None,
            }),
        }
    }

    /// Hands out the next cycle number.
    pub fn begin_cycle(&self) -> u64 {
        let mut inner = self.lock();
        inner.issued_cycle += 1;
        inner.issued_cycle
    }

    /// Replaces the published record set. Returns false when `cycle` is
    /// stale, in which case the store is left untouched.
    pub fn publish(&self, cycle: u64, records: Vec<PingRecord>) -> bool {
        let mut inner = self.lock();
        if cycle <= inner.published_cycle {
            return false;
        }
        inner.published_cycle = cycle;
        inner.records = records;
        inner.updated_at = Some(SystemTime::now());
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            records: inner.records.clone(),
            updated_at: inner.updated_at,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a panicked writer; the data itself is
        // still a complete record set.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str) -> PingRecord {
        PingRecord {
            ip: ip.to_string(),
            duration: 1000,
            time_attempt: None,
        }
    }

    #[test]
    fn starts_empty() {
        let store = RecordStore::new();
        let snap = store.snapshot();
        assert!(snap.records.is_empty());
        assert!(snap.updated_at.is_none());
    }

    #[test]
    fn publish_replaces_whole_set() {
        let store = RecordStore::new();
        let first = store.begin_cycle();
        assert!(store.publish(first, vec![record("1.1.1.1"), record("2.2.2.2")]));

        let second = store.begin_cycle();
        assert!(store.publish(second, vec![record("3.3.3.3")]));

        let snap = store.snapshot();
        assert_eq!(snap.records.len(), 1);
        assert_eq!(snap.records[0].ip, "3.3.3.3");
    }

    #[test]
    fn stale_cycle_is_discarded() {
        let store = RecordStore::new();
        let slow = store.begin_cycle();
        let fast = store.begin_cycle();

        assert!(store.publish(fast, vec![record("9.9.9.9")]));
        assert!(!store.publish(slow, vec![record("1.1.1.1")]));

        let snap = store.snapshot();
        assert_eq!(snap.records[0].ip, "9.9.9.9");
    }

    #[test]
    fn failed_cycle_keeps_previous_records() {
        let store = RecordStore::new();
        let cycle = store.begin_cycle();
        assert!(store.publish(cycle, vec![record("1.1.1.1")]));

        // A failing cycle takes a number but never publishes.
        let _abandoned = store.begin_cycle();

        let snap = store.snapshot();
        assert_eq!(snap.records.len(), 1);
        assert_eq!(snap.records[0].ip, "1.1.1.1");
    }

    #[test]
    fn republishing_same_cycle_is_rejected() {
        let store = RecordStore::new();
        let cycle = store.begin_cycle();
        assert!(store.publish(cycle, vec![record("1.1.1.1")]));
        assert!(!store.publish(cycle, vec![record("2.2.2.2")]));
        assert_eq!(store.snapshot().records[0].ip, "1.1.1.1");
    }
}
