//! Circular drum zones and the ordered map that holds them.
//!
//! Enumeration order matters: when a point lies inside two overlapping
//! circles, the zone listed first wins.

use std::collections::HashSet;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

// ════════════════════════════════════════════════════════════════════════════
// Rgb
// ════════════════════════════════════════════════════════════════════════════

/// Display color of a zone, deserialized from `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Packed `0x00RRGGBB`, the pixel layout of the framebuffer.
    pub fn packed(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Zone
// ════════════════════════════════════════════════════════════════════════════

/// A named circular target.  The name also picks the sound (`<name>.wav`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    name:   String,
    center: IVec2,
    radius: f32,
    color:  Rgb,
}

impl Zone {
    pub fn new(name: impl Into<String>, center: IVec2, radius: f32, color: Rgb) -> Self {
        Zone { name: name.into(), center, radius, color }
    }

    pub fn name(&self)   -> &str  { &self.name }
    pub fn center(&self) -> IVec2 { self.center }
    pub fn radius(&self) -> f32   { self.radius }
    pub fn color(&self)  -> Rgb   { self.color }

    /// Euclidean distance from `point` to the zone center.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.center.as_vec2().distance(point)
    }

    /// Strictly inside the circle; the rim itself does not count.
    pub fn contains(&self, point: Vec2) -> bool {
        self.distance_to(point) < self.radius
    }

    fn overlaps(&self, other: &Zone) -> bool {
        self.center.as_vec2().distance(other.center.as_vec2()) < self.radius + other.radius
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ZoneMap
// ════════════════════════════════════════════════════════════════════════════

/// The fixed set of zones for a session, in enumeration order.
#[derive(Clone, Debug)]
pub struct ZoneMap {
    zones: Vec<Zone>,
}

impl ZoneMap {
    /// Validate and freeze a zone list.
    ///
    /// Rejects an empty list, duplicate or malformed names, and radii that
    /// are not positive and finite.  Overlapping circles are allowed but
    /// logged, since only the first of them can ever be struck at a shared
    /// point.
    pub fn new(zones: Vec<Zone>) -> Result<Self, ConfigError> {
        if zones.is_empty() {
            return Err(ConfigError::NoZones);
        }

        let mut seen = HashSet::new();
        for zone in &zones {
            if !valid_name(&zone.name) {
                return Err(ConfigError::InvalidZoneName(zone.name.clone()));
            }
            if !seen.insert(zone.name.as_str()) {
                return Err(ConfigError::DuplicateZone(zone.name.clone()));
            }
            if !(zone.radius.is_finite() && zone.radius > 0.0) {
                return Err(ConfigError::InvalidRadius {
                    name:   zone.name.clone(),
                    radius: zone.radius,
                });
            }
        }

        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                if a.overlaps(b) {
                    warn!(first = %a.name, second = %b.name,
                          "zones overlap; `{}` wins where both match", a.name);
                }
            }
        }

        Ok(ZoneMap { zones })
    }

    /// Eight zones on a 640×480 frame: three on top, two in the middle,
    /// three at the bottom.  No two circles touch.
    pub fn reference_kit() -> Self {
        ZoneMap { zones: reference_zones() }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.zones.iter().map(|z| z.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl<'a> IntoIterator for &'a ZoneMap {
    type Item     = &'a Zone;
    type IntoIter = std::slice::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}

/// The zone list behind [`ZoneMap::reference_kit`].
pub fn reference_zones() -> Vec<Zone> {
    const R: f32 = 60.0;
    vec![
        // top row
        Zone::new("A", IVec2::new(100, 100), R, Rgb(255, 0, 0)),
        Zone::new("B", IVec2::new(320, 100), R, Rgb(0, 255, 0)),
        Zone::new("C", IVec2::new(540, 100), R, Rgb(0, 0, 255)),
        // middle row
        Zone::new("D", IVec2::new(210, 240), R, Rgb(255, 255, 0)),
        Zone::new("E", IVec2::new(430, 240), R, Rgb(255, 0, 255)),
        // bottom row
        Zone::new("F", IVec2::new(100, 380), R, Rgb(0, 255, 255)),
        Zone::new("G", IVec2::new(320, 380), R, Rgb(128, 128, 255)),
        Zone::new("H", IVec2::new(540, 380), R, Rgb(255, 128, 0)),
    ]
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
