//! One drumming session: frames in, strikes and sounds out.
//!
//! `Session` owns everything the frame loop touches (frame source, hand
//! source, audio sink, sound bank, hit detector, velocity tracker) and is
//! advanced one frame at a time with [`Session::step`].  Nothing here knows
//! about the window; the caller decides what to draw and when to stop.

use std::time::Instant;

use drum_audio::{AudioSink, OutputFormat, SoundBank};
use drum_core::{DetectorParams, Hand, HitDetector, Strike, VelocityTracker, ZoneMap};
use glam::Vec2;
use tracing::{debug, info, warn};

use crate::capture::{Frame, FrameSource};
use crate::config::{AppConfig, TrackingConfig};
use crate::error::Result;
use crate::tracking::HandSource;

// ════════════════════════════════════════════════════════════════════════════
// Reports
// ════════════════════════════════════════════════════════════════════════════

/// What happened to one tracked hand in a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    /// Position in the frame's detection list; doubles as the hand's id.
    pub slot:     usize,
    pub position: Vec2,
    /// Pixels moved since this slot's previous frame.
    pub speed:    f32,
    pub strike:   Option<Strike>,
}

/// Everything the renderer needs to know about a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub hands: Vec<HandReport>,
}

impl FrameReport {
    pub fn strikes(&self) -> impl Iterator<Item = &Strike> + '_ {
        self.hands.iter().filter_map(|h| h.strike.as_ref())
    }

    pub fn is_struck(&self, zone: &str) -> bool {
        self.strikes().any(|s| s.zone == zone)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session<C, H, A> {
    // ── inputs ───────────────────────────────────────────────────────────
    capture:  C,
    hands:    H,
    tracking: TrackingConfig,

    // ── detection ────────────────────────────────────────────────────────
    detector: HitDetector,
    tracker:  VelocityTracker,

    // ── output ───────────────────────────────────────────────────────────
    audio:    A,
    bank:     SoundBank,

    frames:   u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Kit
// ════════════════════════════════════════════════════════════════════════════

/// The validated zone layout, detector settings and every zone's sound.
pub struct Kit {
    zones:  ZoneMap,
    params: DetectorParams,
    bank:   SoundBank,
}

impl Kit {
    /// Validate the kit and load every zone's sound at `format`.
    pub fn load(config: &AppConfig, format: OutputFormat) -> Result<Self> {
        let zones  = config.zone_map()?;
        let params = config.detection.params()?;
        let bank   = SoundBank::load(&config.audio.sounds_dir, zones.names(), format)?;
        Ok(Kit { zones, params, bank })
    }
}

impl<C: FrameSource, H: HandSource, A: AudioSink> Session<C, H, A> {
    /// Validate the kit and load every zone's sound.  Fails before the first
    /// frame is read if any of that is wrong.
    pub fn init(config: &AppConfig, capture: C, hands: H, audio: A) -> Result<Self> {
        let kit = Kit::load(config, audio.format())?;
        Ok(Self::with_kit(kit, config.tracking.clone(), capture, hands, audio))
    }

    /// Build around an already loaded kit.
    pub fn with_kit(kit: Kit, tracking: TrackingConfig, capture: C, hands: H, audio: A) -> Self {
        let Kit { zones, params, bank } = kit;
        info!(
            zones = zones.len(),
            threshold = params.velocity_threshold(),
            cooldown_ms = params.cooldown().as_millis() as u64,
            "session ready"
        );

        Session {
            capture,
            hands,
            tracking,
            detector: HitDetector::new(zones, params),
            tracker:  VelocityTracker::new(),
            audio,
            bank,
            frames:   0,
        }
    }

    /// Advance one frame.  `Ok(None)` means the frame source is exhausted.
    pub fn step(&mut self, now: Instant) -> Result<Option<(Frame, FrameReport)>> {
        let Some(mut frame) = self.capture.read() else {
            info!(frames = self.frames, "end of frame stream");
            return Ok(None);
        };
        self.frames += 1;

        if self.tracking.mirror {
            frame.mirror();
        }
        let hands = self.hands.detect(&frame)?;
        let report = self.process_hands(&hands, now);
        Ok(Some((frame, report)))
    }

    /// Run detection for one frame's hands, in order, and play any strikes.
    ///
    /// Hands under `min_confidence` are dropped first; the first `max_hands`
    /// survivors are tracked, and their order gives the slot ids.  Earlier
    /// hands win a shared zone.
    pub fn process_hands(&mut self, hands: &[Hand], now: Instant) -> FrameReport {
        let min_confidence = self.tracking.min_confidence;
        let accepted: Vec<&Hand> = hands
            .iter()
            .filter(|hand| {
                let ok = hand.meets_confidence(min_confidence);
                if !ok {
                    debug!(score = ?hand.score, "hand below confidence");
                }
                ok
            })
            .take(self.tracking.max_hands)
            .collect();

        let mut report = FrameReport::default();
        for (slot, hand) in accepted.into_iter().enumerate() {
            let Some(position) = hand.landmark(self.tracking.reference_landmark) else {
                warn!(
                    slot,
                    landmark = self.tracking.reference_landmark,
                    count = hand.landmarks.len(),
                    "hand is missing the reference landmark"
                );
                continue;
            };

            let speed  = self.tracker.update(slot, position);
            let strike = self.detector.detect(position, speed, now);
            if let Some(s) = &strike {
                self.play(s);
            }
            report.hands.push(HandReport { slot, position, speed, strike });
        }
        report
    }

    fn play(&mut self, strike: &Strike) {
        match self.bank.get(&strike.zone) {
            Some(sound) => self.audio.play(sound, strike.gain),
            None        => warn!(zone = %strike.zone, "no sound loaded for zone"),
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn zones(&self)       -> &ZoneMap           { self.detector.zones() }
    pub fn frame_size(&self)  -> (usize, usize)     { self.capture.size() }
    pub fn frames(&self)      -> u64                { self.frames }
    pub fn audio(&self)       -> &A                 { &self.audio }
    pub fn detector(&self)    -> &HitDetector       { &self.detector }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::rc::Rc;
    use std::time::Duration;

    use drum_audio::{AudioError, Sound};
    use drum_core::zone::reference_zones;

    use crate::error::{DrummerError, TrackingError};

    // ── fakes ─────────────────────────────────────────────────────────────

    /// Hands out a fixed number of frames and counts reads.
    struct CountedFrames {
        left:  usize,
        reads: Rc<Cell<usize>>,
        frame: Frame,
    }

    impl CountedFrames {
        fn new(count: usize) -> (Self, Rc<Cell<usize>>) {
            let reads = Rc::new(Cell::new(0));
            let src = CountedFrames { left: count, reads: reads.clone(), frame: Frame::blank(640, 480) };
            (src, reads)
        }
    }

    impl FrameSource for CountedFrames {
        fn read(&mut self) -> Option<Frame> {
            self.reads.set(self.reads.get() + 1);
            if self.left == 0 {
                return None;
            }
            self.left -= 1;
            Some(self.frame.clone())
        }

        fn size(&self) -> (usize, usize) {
            (self.frame.width, self.frame.height)
        }
    }

    /// Plays back scripted detections, then no hands.
    #[derive(Default)]
    struct ScriptedHands {
        script: VecDeque<std::result::Result<Vec<Hand>, TrackingError>>,
    }

    impl ScriptedHands {
        fn then(mut self, hands: Vec<Hand>) -> Self {
            self.script.push_back(Ok(hands));
            self
        }

        fn then_fail(mut self, err: TrackingError) -> Self {
            self.script.push_back(Err(err));
            self
        }
    }

    impl HandSource for ScriptedHands {
        fn detect(&mut self, _frame: &Frame) -> std::result::Result<Vec<Hand>, TrackingError> {
            self.script.pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        plays: Vec<(String, f32)>,
    }

    impl AudioSink for RecordingSink {
        fn format(&self) -> OutputFormat {
            OutputFormat::default()
        }

        fn play(&mut self, sound: &Sound, gain: f32) {
            self.plays.push((sound.name().to_string(), gain));
        }
    }

    // ── fixtures ──────────────────────────────────────────────────────────

    fn write_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels:        1,
            sample_rate:     44_100,
            bits_per_sample: 16,
            sample_format:   hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..64 {
            w.write_sample((i * 100) as i16).unwrap();
        }
        w.finalize().unwrap();
    }

    /// Config pointing at a temp dir holding a sound for every reference zone
    /// except those in `skip`.
    fn kit(skip: &[&str]) -> (tempfile::TempDir, AppConfig) {
        let dir = tempfile::tempdir().unwrap();
        for zone in reference_zones() {
            if !skip.contains(&zone.name()) {
                write_wav(&SoundBank::path_for(dir.path(), zone.name()));
            }
        }
        let mut cfg = AppConfig::default();
        cfg.audio.sounds_dir = dir.path().to_owned();
        cfg.tracking.mirror = false;
        (dir, cfg)
    }

    type TestSession = Session<CountedFrames, ScriptedHands, RecordingSink>;

    fn session(cfg: &AppConfig, hands: ScriptedHands, frames: usize) -> TestSession {
        let (capture, _) = CountedFrames::new(frames);
        Session::init(cfg, capture, hands, RecordingSink::default()).unwrap()
    }

    fn at(x: f32, y: f32) -> Hand {
        Hand::at_point(Vec2::new(x, y))
    }

    // ── startup ───────────────────────────────────────────────────────────

    #[test]
    fn missing_sound_fails_before_any_frame() {
        let (dir, cfg) = kit(&["C"]);
        let (capture, reads) = CountedFrames::new(10);

        let err = Session::init(&cfg, capture, ScriptedHands::default(), RecordingSink::default())
            .err()
            .unwrap();

        let msg = err.to_string();
        assert!(msg.contains("`C`") && msg.contains("C.wav"), "{msg}");
        match err {
            DrummerError::Audio(AudioError::MissingAsset { zone, path }) => {
                assert_eq!(zone, "C");
                assert_eq!(path, dir.path().join("C.wav"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn invalid_kit_is_rejected() {
        let (_dir, mut cfg) = kit(&[]);
        cfg.zones.clear();
        let (capture, _) = CountedFrames::new(1);
        let res = Session::init(&cfg, capture, ScriptedHands::default(), RecordingSink::default());
        assert!(matches!(res, Err(DrummerError::Config(_))));
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn swing_into_a_zone_plays_its_sound() {
        let (_dir, cfg) = kit(&[]);
        let hands = ScriptedHands::default()
            .then(vec![at(100.0, 400.0)])
            .then(vec![at(100.0, 100.0)]);
        let mut s = session(&cfg, hands, 5);
        let t0 = Instant::now();

        let (_, first) = s.step(t0).unwrap().unwrap();
        assert_eq!(first.hands[0].speed, 0.0);
        assert_eq!(first.strikes().count(), 0);

        let (_, second) = s.step(t0 + Duration::from_millis(33)).unwrap().unwrap();
        assert_eq!(second.hands[0].speed, 300.0);
        assert!(second.is_struck("A"));
        assert_eq!(s.audio().plays, vec![("A".to_string(), 1.0)]);
    }

    #[test]
    fn end_of_stream_is_not_an_error() {
        let (_dir, cfg) = kit(&[]);
        let mut s = session(&cfg, ScriptedHands::default(), 2);
        let now = Instant::now();
        assert!(s.step(now).unwrap().is_some());
        assert!(s.step(now).unwrap().is_some());
        assert!(s.step(now).unwrap().is_none());
        assert_eq!(s.frames(), 2);
    }

    #[test]
    fn extractor_failure_propagates() {
        let (_dir, cfg) = kit(&[]);
        let hands = ScriptedHands::default().then_fail(TrackingError::Extractor("boom".into()));
        let mut s = session(&cfg, hands, 3);
        let err = s.step(Instant::now()).unwrap_err();
        assert!(matches!(err, DrummerError::Tracking(TrackingError::Extractor(_))));
    }

    #[test]
    fn frames_are_mirrored_when_configured() {
        let (_dir, mut cfg) = kit(&[]);
        cfg.tracking.mirror = true;
        let (mut capture, _) = CountedFrames::new(1);
        let mut data = vec![0u8; 640 * 480 * 3];
        data[0] = 0xFF;
        capture.frame = Frame::from_bgr(640, 480, data);
        let mut s = Session::init(&cfg, capture, ScriptedHands::default(), RecordingSink::default()).unwrap();

        let (frame, _) = s.step(Instant::now()).unwrap().unwrap();
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.pixel(639, 0), Some([0xFF, 0, 0]));
    }

    // ── process_hands ─────────────────────────────────────────────────────

    #[test]
    fn first_hand_takes_a_shared_zone() {
        let (_dir, cfg) = kit(&[]);
        let mut s = session(&cfg, ScriptedHands::default(), 0);
        let t0 = Instant::now();

        s.process_hands(&[at(100.0, 400.0), at(120.0, 400.0)], t0);
        let report = s.process_hands(&[at(100.0, 100.0), at(120.0, 100.0)], t0 + Duration::from_millis(33));

        assert_eq!(report.hands[0].strike.as_ref().map(|s| s.zone.as_str()), Some("A"));
        assert_eq!(report.hands[1].strike, None);
        assert_eq!(s.audio().plays.len(), 1);
    }

    #[test]
    fn hands_beyond_max_are_ignored() {
        let (_dir, mut cfg) = kit(&[]);
        cfg.tracking.max_hands = 1;
        let mut s = session(&cfg, ScriptedHands::default(), 0);
        let report = s.process_hands(&[at(10.0, 10.0), at(20.0, 20.0), at(30.0, 30.0)], Instant::now());
        assert_eq!(report.hands.len(), 1);
        assert_eq!(report.hands[0].slot, 0);
    }

    #[test]
    fn low_confidence_hand_does_not_take_a_slot() {
        let (_dir, cfg) = kit(&[]);
        let mut s = session(&cfg, ScriptedHands::default(), 0);
        let t0 = Instant::now();

        s.process_hands(&[at(100.0, 400.0).with_score(0.95)], t0);
        let report = s.process_hands(
            &[at(600.0, 20.0).with_score(0.3), at(100.0, 100.0).with_score(0.95)],
            t0 + Duration::from_millis(33),
        );

        assert_eq!(report.hands.len(), 1);
        assert_eq!(report.hands[0].slot, 0);
        assert_eq!(report.hands[0].speed, 300.0);
        assert!(report.is_struck("A"));
        assert_eq!(s.audio().plays, vec![("A".to_string(), 1.0)]);
    }

    #[test]
    fn max_hands_counts_only_confident_hands() {
        let (_dir, cfg) = kit(&[]);
        assert_eq!(cfg.tracking.max_hands, 2);
        let mut s = session(&cfg, ScriptedHands::default(), 0);
        let hands = [
            at(10.0, 10.0).with_score(0.3),
            at(20.0, 20.0).with_score(0.95),
            at(30.0, 30.0).with_score(0.95),
        ];
        let report = s.process_hands(&hands, Instant::now());
        let slots: Vec<usize> = report.hands.iter().map(|h| h.slot).collect();
        assert_eq!(slots, vec![0, 1]);
        assert_eq!(report.hands[1].position, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn hand_without_reference_landmark_is_skipped() {
        let (_dir, cfg) = kit(&[]);
        let mut s = session(&cfg, ScriptedHands::default(), 0);
        let stub = Hand::new(vec![Vec2::new(100.0, 100.0); 5]);
        let report = s.process_hands(&[stub, at(300.0, 300.0)], Instant::now());
        assert_eq!(report.hands.len(), 1);
        assert_eq!(report.hands[0].slot, 1);
    }

    #[test]
    fn slow_hands_never_play() {
        let (_dir, cfg) = kit(&[]);
        let mut s = session(&cfg, ScriptedHands::default(), 0);
        let t0 = Instant::now();
        for i in 0..20u64 {
            let x = 40.0 + i as f32 * 10.0;
            s.process_hands(&[at(x, 100.0)], t0 + Duration::from_millis(i * 33));
        }
        assert!(s.audio().plays.is_empty());
    }
}
