//! Strike detection: which zone, if any, a moving hand just hit.
//!
//! A zone fires when all three gates pass:
//!
//! * **spatial**: the hand is strictly inside the circle,
//! * **velocity**: the hand moved faster than the threshold this frame,
//! * **cooldown**: the zone has not fired within the cooldown interval.
//!
//! Zones are scanned in [`ZoneMap`] order and the first eligible one wins,
//! so one physical strike yields at most one sound per call.

use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::debug;

use crate::cooldown::CooldownLedger;
use crate::error::ConfigError;
use crate::zone::ZoneMap;

// ════════════════════════════════════════════════════════════════════════════
// DetectorParams
// ════════════════════════════════════════════════════════════════════════════

/// Tuning for [`HitDetector`].  Speeds are in pixels per frame, so both
/// numbers depend on camera resolution and frame rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorParams {
    velocity_threshold:  f32,
    velocity_normalizer: f32,
    cooldown:            Duration,
}

impl DetectorParams {
    pub fn new(
        velocity_threshold:  f32,
        velocity_normalizer: f32,
        cooldown:            Duration,
    ) -> Result<Self, ConfigError> {
        if !(velocity_threshold.is_finite() && velocity_threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold(velocity_threshold));
        }
        if !(velocity_normalizer.is_finite() && velocity_normalizer > 0.0) {
            return Err(ConfigError::InvalidNormalizer(velocity_normalizer));
        }
        Ok(DetectorParams { velocity_threshold, velocity_normalizer, cooldown })
    }

    pub fn velocity_threshold(&self)  -> f32      { self.velocity_threshold }
    pub fn velocity_normalizer(&self) -> f32      { self.velocity_normalizer }
    pub fn cooldown(&self)            -> Duration { self.cooldown }

    /// `speed / normalizer`, clamped to `[0, 1]`.
    pub fn gain_for(&self, speed: f32) -> f32 {
        (speed / self.velocity_normalizer).clamp(0.0, 1.0)
    }
}

impl Default for DetectorParams {
    /// 125 px/frame threshold, full volume at 200 px/frame, 100 ms cooldown.
    fn default() -> Self {
        DetectorParams {
            velocity_threshold:  125.0,
            velocity_normalizer: 200.0,
            cooldown:            Duration::from_millis(100),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Strike
// ════════════════════════════════════════════════════════════════════════════

/// A detected hit, consumed immediately by audio and overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Strike {
    pub zone: String,
    /// Playback volume in `[0, 1]`.
    pub gain: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// HitDetector
// ════════════════════════════════════════════════════════════════════════════

/// Owns the zone layout and the cooldown ledger it gates against.
#[derive(Debug, Clone)]
pub struct HitDetector {
    zones:  ZoneMap,
    ledger: CooldownLedger,
    params: DetectorParams,
}

impl HitDetector {
    pub fn new(zones: ZoneMap, params: DetectorParams) -> Self {
        HitDetector { zones, ledger: CooldownLedger::new(), params }
    }

    /// Check one hand against every zone.  On a hit the zone's cooldown is
    /// consumed at `now` and scanning stops.
    pub fn detect(&mut self, position: Vec2, speed: f32, now: Instant) -> Option<Strike> {
        if !(speed > self.params.velocity_threshold) {
            return None;
        }

        let zone = self.zones.iter().find(|zone| {
            zone.contains(position)
                && self.ledger.is_ready(zone.name(), now, self.params.cooldown)
        })?;

        let gain = self.params.gain_for(speed);
        self.ledger.record(zone.name(), now);
        debug!(zone = zone.name(), speed, gain, "strike");

        Some(Strike { zone: zone.name().to_owned(), gain })
    }

    pub fn zones(&self)  -> &ZoneMap        { &self.zones }
    pub fn ledger(&self) -> &CooldownLedger { &self.ledger }
    pub fn params(&self) -> &DetectorParams { &self.params }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
