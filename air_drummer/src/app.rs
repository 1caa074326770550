//! Wiring and the main loop.
//!
//! `run` builds the audio output, frame source and hand source from the
//! configuration, hands them to a [`Session`], and drives it together with
//! the [`Visualizer`] until the window closes, Q/Escape is pressed, or the
//! frame stream ends.  Everything it creates is owned by its stack frame and
//! released on the way out, whichever way the loop ends.

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use drum_audio::{AudioSink, CpalOutput, NullSink, OutputFormat};
use tracing::{info, warn};

use crate::capture::{self, FrameSource};
use crate::config::{AppConfig, AudioConfig, HandSourceConfig};
use crate::error::Result;
use crate::session::{FrameReport, Kit, Session};
use crate::tracking::{HandSource, PointerHands, ReplayHands, SimInput, SubprocessHands};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Construction
// ════════════════════════════════════════════════════════════════════════════

/// The default output device, or a silent sink when there is none.
pub fn open_audio(cfg: &AudioConfig) -> Box<dyn AudioSink> {
    match CpalOutput::open(cfg.queue_depth, cfg.max_voices) {
        Ok(out) => Box::new(out),
        Err(e) => {
            warn!("audio output unavailable, hits will be silent: {e}");
            Box::new(NullSink::default())
        }
    }
}

pub fn open_hands(source: &HandSourceConfig, sim_rx: Receiver<SimInput>) -> Result<Box<dyn HandSource>> {
    let hands: Box<dyn HandSource> = match source {
        HandSourceConfig::Pointer => {
            info!("pointer stands in for a hand");
            Box::new(PointerHands::new(sim_rx))
        }
        HandSourceConfig::Subprocess { command } => Box::new(SubprocessHands::spawn(command)?),
        HandSourceConfig::Replay { path }        => Box::new(ReplayHands::open(path)?),
    };
    Ok(hands)
}

/// Load the kit, then open the frame and hand sources.  A missing sound
/// fails here before the camera or extractor process is started.
pub fn prepare(
    config: &AppConfig,
    format: OutputFormat,
    sim_rx: Receiver<SimInput>,
) -> Result<(Kit, Box<dyn FrameSource>, Box<dyn HandSource>)> {
    let kit     = Kit::load(config, format)?;
    let capture = capture::open_default(&config.capture)?;
    let hands   = open_hands(&config.tracking.source, sim_rx)?;
    Ok((kit, capture, hands))
}

// ════════════════════════════════════════════════════════════════════════════
// Status line
// ════════════════════════════════════════════════════════════════════════════

/// Remembers the latest strike so the status line does not flicker.
#[derive(Debug, Default)]
pub struct Status {
    last_hit: Option<(String, f32)>,
    hits:     u64,
}

impl Status {
    pub fn update(&mut self, report: &FrameReport) {
        for strike in report.strikes() {
            self.hits += 1;
            self.last_hit = Some((strike.zone.clone(), strike.gain));
        }
    }

    pub fn line(&self, hands: usize) -> String {
        match &self.last_hit {
            Some((zone, gain)) => format!(
                "HANDS {hands}  HITS {}  LAST {zone} {:.2}  Q QUIT",
                self.hits, gain
            ),
            None => format!("HANDS {hands}  READY  Q QUIT"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the drum kit.  Returns `Ok(())` on a normal stop; startup failures and
/// extractor failures come back as errors.
pub fn run(config: &AppConfig) -> Result<()> {
    // ── Sim input channel (pointer as a hand) ────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    // ── Audio, kit, then sources ──────────────────────────────────────────
    let audio = open_audio(&config.audio);
    let (kit, capture, hands) = prepare(config, audio.format(), sim_rx)?;

    let mut session = Session::with_kit(kit, config.tracking.clone(), capture, hands, audio);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let (width, height) = session.frame_size();
    let mut vis = Visualizer::new(width, height, config.capture.fps, sim_tx)?;

    let mut status = Status::default();

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            info!("quit requested");
            break;
        }

        let Some((frame, report)) = session.step(Instant::now())? else {
            break;
        };

        status.update(&report);
        vis.render(&frame, session.zones(), &report, &status.line(report.hands.len()))?;
    }

    info!(frames = session.frames(), "session finished");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
