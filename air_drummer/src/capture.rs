//! Frames and where they come from.
//!
//! A [`FrameSource`] that cannot produce another frame returns `None`; the
//! loop treats that as the end of the stream, not as a crash.

use crate::config::CaptureConfig;

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// Packed BGR image, 3 bytes per pixel, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width:  usize,
    pub height: usize,
    pub data:   Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// Uniform dark frame.
    pub fn blank(width: usize, height: usize) -> Self {
        Frame { width, height, data: vec![0x1A; width * height * Self::CHANNELS] }
    }

    pub fn from_bgr(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * Self::CHANNELS);
        Frame { width, height, data }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * Self::CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Packed `0x00RRGGBB` for the framebuffer.
    pub fn pixel_rgb(&self, x: usize, y: usize) -> u32 {
        match self.pixel(x, y) {
            Some([b, g, r]) => (r as u32) << 16 | (g as u32) << 8 | b as u32,
            None            => 0,
        }
    }

    /// Flip left to right in place.
    pub fn mirror(&mut self) {
        let row_len = self.width * Self::CHANNELS;
        if row_len == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_len) {
            for x in 0..self.width / 2 {
                let a = x * Self::CHANNELS;
                let b = (self.width - 1 - x) * Self::CHANNELS;
                for c in 0..Self::CHANNELS {
                    row.swap(a + c, b + c);
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource
// ════════════════════════════════════════════════════════════════════════════

pub trait FrameSource {
    /// Next frame, or `None` at end of stream (including device failure).
    fn read(&mut self) -> Option<Frame>;

    /// Frame size in pixels.
    fn size(&self) -> (usize, usize);
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn read(&mut self) -> Option<Frame> {
        (**self).read()
    }

    fn size(&self) -> (usize, usize) {
        (**self).size()
    }
}

/// Endless blank frames, for pointer simulation and replays.
pub struct SyntheticCamera {
    width:  usize,
    height: usize,
}

impl SyntheticCamera {
    pub fn new(width: usize, height: usize) -> Self {
        SyntheticCamera { width, height }
    }
}

impl FrameSource for SyntheticCamera {
    fn read(&mut self) -> Option<Frame> {
        Some(Frame::blank(self.width, self.height))
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OpenCvCamera: real webcam (feature = "camera")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "camera")]
pub use self::camera::OpenCvCamera;

#[cfg(feature = "camera")]
mod camera {
    use opencv::core::Mat;
    use opencv::prelude::*;
    use opencv::videoio;
    use tracing::{info, warn};

    use super::{Frame, FrameSource};
    use crate::config::CaptureConfig;
    use crate::error::{DrummerError, Result};

    /// Webcam read through OpenCV `videoio`.
    pub struct OpenCvCamera {
        cap:    videoio::VideoCapture,
        device: i32,
        width:  usize,
        height: usize,
    }

    impl OpenCvCamera {
        pub fn open(cfg: &CaptureConfig) -> Result<Self> {
            let err = |e: opencv::Error| DrummerError::Capture(e.to_string());

            let mut cap = videoio::VideoCapture::new(cfg.device, videoio::CAP_ANY).map_err(err)?;
            if !cap.is_opened().map_err(err)? {
                return Err(DrummerError::Capture(format!("camera {} is not available", cfg.device)));
            }
            // Requests only; the driver may pick something else.
            let _ = cap.set(videoio::CAP_PROP_FRAME_WIDTH,  cfg.width as f64);
            let _ = cap.set(videoio::CAP_PROP_FRAME_HEIGHT, cfg.height as f64);
            let _ = cap.set(videoio::CAP_PROP_FPS,          cfg.fps as f64);

            let width  = cap.get(videoio::CAP_PROP_FRAME_WIDTH).map_err(err)? as usize;
            let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT).map_err(err)? as usize;
            info!(device = cfg.device, width, height, "camera open");

            Ok(OpenCvCamera { cap, device: cfg.device, width, height })
        }
    }

    impl FrameSource for OpenCvCamera {
        fn read(&mut self) -> Option<Frame> {
            let mut mat = Mat::default();
            match self.cap.read(&mut mat) {
                Ok(true) if !mat.empty() => {}
                Ok(_) => {
                    warn!(device = self.device, "camera returned no frame");
                    return None;
                }
                Err(e) => {
                    warn!(device = self.device, "camera read failed: {e}");
                    return None;
                }
            }
            if mat.channels() as usize != Frame::CHANNELS {
                warn!(channels = mat.channels(), "unexpected camera pixel format");
                return None;
            }

            let (width, height) = (mat.cols() as usize, mat.rows() as usize);
            let data = match mat.data_bytes() {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    warn!("camera frame not readable: {e}");
                    return None;
                }
            };
            self.width  = width;
            self.height = height;
            Some(Frame::from_bgr(width, height, data))
        }

        fn size(&self) -> (usize, usize) {
            (self.width, self.height)
        }
    }

    impl Drop for OpenCvCamera {
        fn drop(&mut self) {
            let _ = self.cap.release();
            info!(device = self.device, "camera released");
        }
    }
}

/// The frame source for this build: the webcam with the `camera` feature,
/// blank frames otherwise.
pub fn open_default(cfg: &CaptureConfig) -> crate::error::Result<Box<dyn FrameSource>> {
    #[cfg(feature = "camera")]
    {
        Ok(Box::new(OpenCvCamera::open(cfg)?))
    }
    #[cfg(not(feature = "camera"))]
    {
        tracing::info!(width = cfg.width, height = cfg.height, "using synthetic frames");
        Ok(Box::new(SyntheticCamera::new(cfg.width, cfg.height)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
