//! A single hand playing zone A, frame by frame.

use std::time::{Duration, Instant};

use drum_core::{DetectorParams, HitDetector, Strike, VelocityTracker, ZoneMap};
use glam::Vec2;

struct Rig {
    tracker:  VelocityTracker,
    detector: HitDetector,
    t0:       Instant,
}

impl Rig {
    fn new() -> Self {
        Rig {
            tracker:  VelocityTracker::new(),
            detector: HitDetector::new(ZoneMap::reference_kit(), DetectorParams::default()),
            t0:       Instant::now(),
        }
    }

    fn frame(&mut self, at_ms: u64, x: f32, y: f32) -> (f32, Option<Strike>) {
        let p = Vec2::new(x, y);
        let speed = self.tracker.update(0, p);
        let now = self.t0 + Duration::from_millis(at_ms);
        (speed, self.detector.detect(p, speed, now))
    }
}

const EDGE: (f32, f32)    = (159.0, 100.0); // radius − 1 from A's center
const OUTSIDE: (f32, f32) = (400.0, 100.0); // between B and C, in no zone
const CENTER: (f32, f32)  = (100.0, 100.0); // A's center, 300 px from OUTSIDE

#[test]
fn resting_at_the_rim_never_hits() {
    let mut rig = Rig::new();
    for i in 0..10 {
        let (speed, strike) = rig.frame(i * 33, EDGE.0, EDGE.1);
        assert_eq!(speed, 0.0);
        assert_eq!(strike, None);
    }
}

#[test]
fn strike_cooldown_and_rearm() {
    let mut rig = Rig::new();

    // at rest near the rim
    assert_eq!(rig.frame(0, EDGE.0, EDGE.1).1, None);
    assert_eq!(rig.frame(33, EDGE.0, EDGE.1).1, None);

    // wind up outside every zone, then swing into A
    assert_eq!(rig.frame(66, OUTSIDE.0, OUTSIDE.1).1, None);
    let (speed, strike) = rig.frame(100, CENTER.0, CENTER.1);
    assert_eq!(speed, 300.0);
    assert_eq!(strike, Some(Strike { zone: "A".into(), gain: 1.0 }));

    // same swing again, inside the 100 ms window
    assert_eq!(rig.frame(133, OUTSIDE.0, OUTSIDE.1).1, None);
    let (speed, strike) = rig.frame(166, CENTER.0, CENTER.1);
    assert_eq!(speed, 300.0);
    assert_eq!(strike, None);

    // cooldown + 1 ms after the first hit
    assert_eq!(rig.frame(190, OUTSIDE.0, OUTSIDE.1).1, None);
    let (_, strike) = rig.frame(201, CENTER.0, CENTER.1);
    assert_eq!(strike.map(|s| s.zone), Some("A".to_string()));
}

#[test]
fn two_hands_same_frame_first_one_wins() {
    let mut tracker = VelocityTracker::new();
    let mut detector = HitDetector::new(ZoneMap::reference_kit(), DetectorParams::default());
    let now = Instant::now();

    tracker.update(0usize, Vec2::new(400.0, 100.0));
    tracker.update(1usize, Vec2::new(100.0, 300.0));

    let a = Vec2::new(95.0, 100.0);
    let b = Vec2::new(105.0, 95.0);
    let first  = detector.detect(a, tracker.update(0, a), now);
    let second = detector.detect(b, tracker.update(1, b), now);

    assert_eq!(first.map(|s| s.zone), Some("A".to_string()));
    assert_eq!(second, None);
}
