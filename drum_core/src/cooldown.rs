//! Per-zone re-trigger bookkeeping.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Last successful trigger of each zone, on the monotonic clock.
///
/// A zone that was never triggered has no entry and is always ready.
#[derive(Debug, Clone, Default)]
pub struct CooldownLedger {
    last: HashMap<String, Instant>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` means the zone has never fired.
    pub fn last_trigger(&self, zone: &str) -> Option<Instant> {
        self.last.get(zone).copied()
    }

    /// Store `at` as the zone's last trigger.  Timestamps never move
    /// backwards: an `at` older than the stored one is ignored.
    pub fn record(&mut self, zone: &str, at: Instant) {
        match self.last.get_mut(zone) {
            Some(prev) => *prev = (*prev).max(at),
            None       => { self.last.insert(zone.to_owned(), at); }
        }
    }

    /// True once strictly more than `interval` has passed since the last
    /// trigger.
    pub fn is_ready(&self, zone: &str, now: Instant, interval: Duration) -> bool {
        match self.last.get(zone) {
            Some(&prev) => now.saturating_duration_since(prev) > interval,
            None        => true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn never_triggered_is_ready() {
        let ledger = CooldownLedger::new();
        assert_eq!(ledger.last_trigger("A"), None);
        assert!(ledger.is_ready("A", Instant::now(), Duration::from_secs(3600)));
    }

    #[test]
    fn interval_is_exclusive() {
        let t0 = Instant::now();
        let mut ledger = CooldownLedger::new();
        ledger.record("A", t0);
        assert!(!ledger.is_ready("A", t0 + 100 * MS, 100 * MS));
        assert!(ledger.is_ready("A", t0 + 101 * MS, 100 * MS));
    }

    #[test]
    fn zero_interval_still_blocks_the_same_instant() {
        let t0 = Instant::now();
        let mut ledger = CooldownLedger::new();
        ledger.record("A", t0);
        assert!(!ledger.is_ready("A", t0, Duration::ZERO));
        assert!(ledger.is_ready("A", t0 + MS, Duration::ZERO));
    }

    #[test]
    fn record_is_monotonic() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut ledger = CooldownLedger::new();
        ledger.record("A", t0);
        ledger.record("A", t0 - 500 * MS);
        assert_eq!(ledger.last_trigger("A"), Some(t0));
        ledger.record("A", t0 + MS);
        assert_eq!(ledger.last_trigger("A"), Some(t0 + MS));
    }

    #[test]
    fn zones_are_independent() {
        let t0 = Instant::now();
        let mut ledger = CooldownLedger::new();
        ledger.record("A", t0);
        assert!(ledger.is_ready("B", t0, 100 * MS));
    }
}
