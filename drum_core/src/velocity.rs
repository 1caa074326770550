//! Frame-to-frame speed of each tracked hand.
//!
//! Speed is the raw pixel distance between two consecutive sightings of the
//! same hand slot.  It is not divided by elapsed time; frame-rate jitter is
//! part of the signal.

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec2;

/// Remembers the last reference-point position of every hand slot it has
/// seen.  Entries are never evicted; a hand that disappears simply stops
/// being updated.
#[derive(Debug, Clone)]
pub struct VelocityTracker<K = usize> {
    last: HashMap<K, Vec2>,
}

impl<K: Eq + Hash> Default for VelocityTracker<K> {
    fn default() -> Self {
        VelocityTracker { last: HashMap::new() }
    }
}

impl<K: Eq + Hash> VelocityTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `position` for `hand` and return the distance travelled since
    /// the previous call for the same hand.  The first sighting returns 0.
    pub fn update(&mut self, hand: K, position: Vec2) -> f32 {
        match self.last.insert(hand, position) {
            Some(prev) => prev.distance(position),
            None       => 0.0,
        }
    }

    pub fn last_position(&self, hand: &K) -> Option<Vec2> {
        self.last.get(hand).copied()
    }

    /// Number of hand slots ever seen.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
