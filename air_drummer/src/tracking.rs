//! Hand landmark sources.
//!
//! Every source answers the same question, "which hands are in this frame",
//! through [`HandSource`].  The session does not care whether the answer came
//! from a landmark model running in a helper process, a recorded session, or
//! the mouse pointer standing in for a fingertip.
//!
//! # Extractor protocol
//!
//! [`SubprocessHands`] talks to an external process over its stdio:
//!
//! 1. The process prints `READY` on a line of its own once its model is loaded.
//! 2. Per frame, we write three little-endian `u32`s (width, height, channels)
//!    followed by the packed BGR pixels.
//! 3. The process answers with one JSON line:
//!
//! ```json
//! {"hands": [{"landmarks": [{"x": 0.41, "y": 0.52}, ...], "score": 0.97, "handedness": "Right"}],
//!  "normalized": true, "error": null}
//! ```
//!
//! With `normalized` set, coordinates are fractions of the frame size and are
//! scaled to pixels here.  A non-null `error` is fatal.  [`ReplayHands`] reads
//! the same JSON lines from a file, one per frame.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{Receiver, TryRecvError};

use drum_core::Hand;
use glam::Vec2;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::capture::Frame;
use crate::error::TrackingError;

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can find hands in a frame.
///
/// Landmarks come back in pixel coordinates of `frame`.  An empty vector
/// means no hands; an error means the source is unusable for the rest of
/// the run.
pub trait HandSource {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>, TrackingError>;
}

impl<H: HandSource + ?Sized> HandSource for Box<H> {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>, TrackingError> {
        (**self).detect(frame)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire format
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct LandmarkMessage {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct HandMessage {
    landmarks:  Vec<LandmarkMessage>,
    #[serde(default)]
    score:      Option<f32>,
    #[serde(default)]
    handedness: Option<String>,
}

/// One frame's worth of extractor output.
#[derive(Debug, Deserialize)]
pub struct DetectionMessage {
    #[serde(default)]
    hands:      Vec<HandMessage>,
    #[serde(default)]
    normalized: bool,
    #[serde(default)]
    error:      Option<String>,
}

impl DetectionMessage {
    pub fn parse(line: &str) -> Result<Self, TrackingError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Convert to pixel-space hands for a `width`×`height` frame.
    pub fn into_hands(self, width: usize, height: usize) -> Result<Vec<Hand>, TrackingError> {
        if let Some(msg) = self.error {
            return Err(TrackingError::Extractor(msg));
        }
        let scale = if self.normalized {
            Vec2::new(width as f32, height as f32)
        } else {
            Vec2::ONE
        };
        Ok(self
            .hands
            .into_iter()
            .map(|h| Hand {
                landmarks:  h.landmarks.iter().map(|l| Vec2::new(l.x, l.y) * scale).collect(),
                score:      h.score,
                handedness: h.handedness,
            })
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PointerHands: mouse pointer as a single fingertip (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the display window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in window pixels, `None` when it left the window.
    Pointer(Option<Vec2>),
}

/// Hand source driven by [`SimInput`] events from the visualizer.
///
/// The pointer is one hand with every landmark at the pointer position, so
/// any reference landmark works.  Positions are already in display space.
pub struct PointerHands {
    rx:      Receiver<SimInput>,
    pointer: Option<Vec2>,
}

impl PointerHands {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        PointerHands { rx, pointer: None }
    }
}

impl HandSource for PointerHands {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Hand>, TrackingError> {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pointer(p)) => self.pointer = p,
                Err(TryRecvError::Empty) => break,
                // Window gone: keep the last position.
                Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(self.pointer.map(Hand::at_point).into_iter().collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SubprocessHands: external landmark model
// ════════════════════════════════════════════════════════════════════════════

/// Landmark extractor running as a child process.  The child is killed when
/// this is dropped.
pub struct SubprocessHands {
    command: String,
    child:   Child,
    stdin:   ChildStdin,
    stdout:  BufReader<ChildStdout>,
}

impl SubprocessHands {
    /// Start `command` (program followed by its arguments) and wait for its
    /// `READY` line.
    pub fn spawn(command: &[String]) -> Result<Self, TrackingError> {
        let display = command.join(" ");
        let (program, args) = command.split_first().ok_or_else(|| TrackingError::Spawn {
            command: display.clone(),
            source:  std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| TrackingError::Spawn { command: display.clone(), source })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(i), Some(o)) => (i, o),
            _ => {
                let _ = child.kill();
                return Err(TrackingError::Closed);
            }
        };
        let mut hands = SubprocessHands {
            command: display,
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };

        let ready = hands.read_line()?;
        if ready.trim() != "READY" {
            return Err(TrackingError::NotReady(ready.trim().to_string()));
        }
        info!(command = %hands.command, "landmark extractor ready");
        Ok(hands)
    }

    fn read_line(&mut self) -> Result<String, TrackingError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(TrackingError::Closed);
        }
        Ok(line)
    }

    fn send_frame(&mut self, frame: &Frame) -> Result<(), TrackingError> {
        let header = [frame.width as u32, frame.height as u32, Frame::CHANNELS as u32];
        for v in header {
            self.stdin.write_all(&v.to_le_bytes())?;
        }
        self.stdin.write_all(&frame.data)?;
        self.stdin.flush()?;
        Ok(())
    }
}

impl HandSource for SubprocessHands {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>, TrackingError> {
        self.send_frame(frame)?;
        let line = self.read_line()?;
        let hands = DetectionMessage::parse(&line)?.into_hands(frame.width, frame.height)?;
        debug!(hands = hands.len(), "extractor response");
        Ok(hands)
    }
}

impl Drop for SubprocessHands {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        info!(command = %self.command, "landmark extractor stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayHands: recorded landmark lines
// ════════════════════════════════════════════════════════════════════════════

/// Plays back one [`DetectionMessage`] line per frame.  Blank lines and the
/// end of the file mean no hands.
pub struct ReplayHands<R> {
    reader:   R,
    line_no:  usize,
    finished: bool,
}

impl<R: BufRead> ReplayHands<R> {
    pub fn new(reader: R) -> Self {
        ReplayHands { reader, line_no: 0, finished: false }
    }

    /// Whether every recorded frame has been played.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ReplayHands<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, TrackingError> {
        let file = File::open(path)?;
        info!(path = %path.display(), "replaying landmarks");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> HandSource for ReplayHands<R> {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>, TrackingError> {
        if self.finished {
            return Ok(Vec::new());
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.finished = true;
            debug!(frames = self.line_no, "replay exhausted");
            return Ok(Vec::new());
        }
        self.line_no += 1;
        if line.trim().is_empty() {
            return Ok(Vec::new());
        }
        DetectionMessage::parse(&line)
            .and_then(|m| m.into_hands(frame.width, frame.height))
            .map_err(|e| {
                warn!(line = self.line_no, "bad replay line");
                e
            })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
