//! Software-rendered kit overlay using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  (A)        (B)        (C)               │
//! │        (D)        (E)          ● VEL 212 │   camera frame with
//! │  (F)        (G)        (H)               │   zones and hands on top
//! ├──────────────────────────────────────────┤
//! │  status line                             │
//! └──────────────────────────────────────────┘
//! ```
//!
//! All drawing goes through [`Canvas`], which knows nothing about windows;
//! [`Visualizer`] owns the window, presents the canvas and turns keyboard
//! and mouse input into quit requests and [`SimInput`] events.

use std::sync::mpsc::Sender;

use drum_core::ZoneMap;
use glam::Vec2;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::capture::Frame;
use crate::error::{DrummerError, Result};
use crate::session::FrameReport;
use crate::tracking::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const STATUS_H:    usize = 18;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const STATUS_BG:       u32   = 0xFF0F3460;
const TEXT_COLOR:      u32   = 0xFFE0E0E0;
const HIT_COLOR:       u32   = 0xFFFFFFFF;
const HAND_COLOR:      u32   = 0xFF00FF00;
const ZONE_THICKNESS:  f32   = 2.0;
const HAND_RADIUS:     f32   = 6.0;
const LABEL_SCALE:     usize = 3;
const GLYPH_W:         usize = 3;
const GLYPH_H:         usize = 5;

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

/// `0xAARRGGBB` pixel buffer with a few primitives.
pub struct Canvas {
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, buf: vec![BG_COLOR; width * height] }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buf[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.buf.fill(BG_COLOR);
    }

    /// Copy a camera frame to the top-left corner, clipped to the canvas.
    pub fn blit_frame(&mut self, frame: &Frame) {
        let w = frame.width.min(self.width);
        let h = frame.height.min(self.height);
        for y in 0..h {
            for x in 0..w {
                self.buf[y * self.width + x] = 0xFF000000 | frame.pixel_rgb(x, y);
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    /// Pixels whose centre lies within `radius - thickness/2 ..= radius + thickness/2`
    /// of `center`.  A thickness of `None` fills the disc.
    pub fn circle(&mut self, center: Vec2, radius: f32, thickness: Option<f32>, color: u32) {
        let half  = thickness.map_or(0.0, |t| t / 2.0);
        let outer = radius + half;
        let inner = thickness.map_or(0.0, |_| (radius - half).max(0.0));

        let x0 = (center.x - outer).floor() as isize;
        let x1 = (center.x + outer).ceil() as isize;
        let y0 = (center.y - outer).floor() as isize;
        let y1 = (center.y + outer).ceil() as isize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32, y as f32).distance(center);
                let on = match thickness {
                    Some(_) => d >= inner && d <= outer,
                    None    => d <= radius,
                };
                if on {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `scale`×`scale` block.
    pub fn text(&mut self, text: &str, x: isize, y: isize, scale: usize, color: u32) {
        let scale = scale.max(1) as isize;
        let mut cx = x;
        for ch in text.chars() {
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.set_pixel(
                                cx + col as isize * scale + dx,
                                y + row as isize * scale + dy,
                                color,
                            );
                        }
                    }
                }
            }
            cx += (GLYPH_W as isize + 1) * scale;
            if cx >= self.width as isize { break; }
        }
    }

    /// Width in pixels of `text` drawn at `scale`.
    pub fn text_width(text: &str, scale: usize) -> usize {
        let n = text.chars().count();
        if n == 0 { 0 } else { (n * (GLYPH_W + 1) - 1) * scale.max(1) }
    }

    /// Draw one frame of the overlay: camera image, zones (filled white when
    /// struck this frame), hand markers with their speed, then the status line.
    pub fn draw_scene(&mut self, frame: &Frame, zones: &ZoneMap, report: &FrameReport, status: &str) {
        self.clear();
        self.blit_frame(frame);

        for zone in zones {
            let center = zone.center().as_vec2();
            if report.is_struck(zone.name()) {
                self.circle(center, zone.radius(), None, HIT_COLOR);
            }
            let color = 0xFF000000 | zone.color().packed();
            self.circle(center, zone.radius(), Some(ZONE_THICKNESS), color);

            let w = Self::text_width(zone.name(), LABEL_SCALE) as isize;
            let h = (GLYPH_H * LABEL_SCALE) as isize;
            self.text(zone.name(), center.x as isize - w / 2, center.y as isize - h / 2, LABEL_SCALE, color);
        }

        for hand in &report.hands {
            self.circle(hand.position, HAND_RADIUS, None, HAND_COLOR);
            let label = format!("VEL {}", hand.speed.round() as i64);
            self.text(
                &label,
                hand.position.x as isize + HAND_RADIUS as isize + 4,
                hand.position.y as isize - (GLYPH_H * 2) as isize / 2,
                2,
                HAND_COLOR,
            );
        }

        let bar_y = frame.height.min(self.height.saturating_sub(STATUS_H));
        self.fill_rect(0, bar_y, self.width, STATUS_H, STATUS_BG);
        self.text(status, 6, (bar_y + (STATUS_H - GLYPH_H * 2) / 2) as isize, 2, TEXT_COLOR);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    canvas:  Canvas,
    sim_tx:  Sender<SimInput>,
    pointer: Option<Vec2>,
}

impl Visualizer {
    /// Open a window for `width`×`height` frames plus the status bar.
    pub fn new(width: usize, height: usize, fps: u32, sim_tx: Sender<SimInput>) -> Result<Self> {
        let canvas = Canvas::new(width, height + STATUS_H);
        let mut window = Window::new(
            "Air Drummer",
            canvas.width(),
            canvas.height(),
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| DrummerError::Display(e.to_string()))?;
        window.set_target_fps(fps.max(1) as usize);

        Ok(Visualizer { window, canvas, sim_tx, pointer: None })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Forward pointer movement to the hand simulator.  Returns false when the
    /// user asked to quit (Q, Escape, or closing the window).
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let quit = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if quit(Key::Q) || quit(Key::Escape) {
            return false;
        }

        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Vec2::new(x, y));
        if pointer != self.pointer {
            self.pointer = pointer;
            // Nobody listening unless the pointer is the hand source.
            let _ = self.sim_tx.send(SimInput::Pointer(pointer));
        }
        true
    }

    pub fn render(&mut self, frame: &Frame, zones: &ZoneMap, report: &FrameReport, status: &str) -> Result<()> {
        self.canvas.draw_scene(frame, zones, report, status);
        self.window
            .update_with_buffer(self.canvas.pixels(), self.canvas.width(), self.canvas.height())
            .map_err(|e| DrummerError::Display(e.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HandReport;
    use drum_core::Strike;

    fn lit(c: &Canvas, color: u32) -> usize {
        c.pixels().iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn outline_leaves_the_centre_untouched() {
        let mut c = Canvas::new(100, 100);
        c.circle(Vec2::new(50.0, 50.0), 20.0, Some(2.0), 0xFFFF0000);
        assert_eq!(c.pixel(50, 50), Some(BG_COLOR));
        assert_eq!(c.pixel(70, 50), Some(0xFFFF0000));
        assert_eq!(c.pixel(50, 30), Some(0xFFFF0000));
    }

    #[test]
    fn filled_circle_covers_the_centre() {
        let mut c = Canvas::new(100, 100);
        c.circle(Vec2::new(50.0, 50.0), 10.0, None, HIT_COLOR);
        assert_eq!(c.pixel(50, 50), Some(HIT_COLOR));
        assert_eq!(c.pixel(50, 65), Some(BG_COLOR));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut c = Canvas::new(20, 20);
        c.circle(Vec2::new(-5.0, -5.0), 12.0, None, HIT_COLOR);
        c.text("HELLO", 15, 15, 4, HIT_COLOR);
        assert_eq!(c.pixel(0, 0), Some(HIT_COLOR));
        assert_eq!(c.pixels().len(), 400);
    }

    #[test]
    fn text_scale_grows_the_glyph() {
        let mut one = Canvas::new(40, 40);
        one.text("A", 0, 0, 1, TEXT_COLOR);
        let mut three = Canvas::new(40, 40);
        three.text("A", 0, 0, 3, TEXT_COLOR);
        assert_eq!(lit(&three, TEXT_COLOR), lit(&one, TEXT_COLOR) * 9);
        assert_eq!(Canvas::text_width("AB", 3), 21);
        assert_eq!(Canvas::text_width("", 3), 0);
    }

    #[test]
    fn reference_labels_have_real_glyphs() {
        let dot = char_glyph('#');
        for c in "ABCDEFGHVELQUIT".chars() {
            assert_ne!(char_glyph(c), dot, "{c}");
        }
    }

    #[test]
    fn frame_pixels_are_copied_as_rgb() {
        let frame = Frame::from_bgr(2, 1, vec![0x30, 0x20, 0x10, 0, 0, 0]);
        let mut c = Canvas::new(4, 4);
        c.blit_frame(&frame);
        assert_eq!(c.pixel(0, 0), Some(0xFF102030));
        assert_eq!(c.pixel(2, 0), Some(BG_COLOR));
    }

    #[test]
    fn struck_zone_is_filled_white() {
        let zones = ZoneMap::reference_kit();
        let frame = Frame::blank(640, 480);
        let mut c = Canvas::new(640, 480 + STATUS_H);

        let quiet = FrameReport::default();
        c.draw_scene(&frame, &zones, &quiet, "READY");
        // Just inside A's rim, away from the label.
        assert_ne!(c.pixel(100, 150), Some(HIT_COLOR));

        let hit = FrameReport {
            hands: vec![HandReport {
                slot:     0,
                position: Vec2::new(300.0, 300.0),
                speed:    250.0,
                strike:   Some(Strike { zone: "A".into(), gain: 1.0 }),
            }],
        };
        c.draw_scene(&frame, &zones, &hit, "HIT A");
        assert_eq!(c.pixel(100, 150), Some(HIT_COLOR));
        assert_eq!(c.pixel(300, 300), Some(HAND_COLOR));
        // B was not struck.
        assert_ne!(c.pixel(320, 150), Some(HIT_COLOR));
    }

    #[test]
    fn status_bar_sits_below_the_frame() {
        let zones = ZoneMap::reference_kit();
        let frame = Frame::blank(640, 480);
        let mut c = Canvas::new(640, 480 + STATUS_H);
        c.draw_scene(&frame, &zones, &FrameReport::default(), "");
        assert_eq!(c.pixel(639, 480), Some(STATUS_BG));
        assert_eq!(c.pixel(639, 479), Some(0xFF1A1A1A));
    }
}
