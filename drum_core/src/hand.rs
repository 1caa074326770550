//! Hands as reported by a landmark extractor.

use glam::Vec2;

/// Landmark indices (MediaPipe hand model numbering, 21 points).
pub mod landmarks {
    pub const WRIST:      usize = 0;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_TIP:  usize = 20;

    /// Points per hand.
    pub const COUNT: usize = 21;
}

/// One detected hand: landmarks in pixel coordinates, labeled by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub landmarks:  Vec<Vec2>,
    /// Detection confidence in `[0, 1]`, when the extractor reports one.
    pub score:      Option<f32>,
    /// `"Left"` / `"Right"`, when known.
    pub handedness: Option<String>,
}

impl Hand {
    pub fn new(landmarks: Vec<Vec2>) -> Self {
        Hand { landmarks, ..Default::default() }
    }

    /// A hand whose every landmark sits on `point`, as produced by a pointer.
    pub fn at_point(point: Vec2) -> Self {
        Hand::new(vec![point; landmarks::COUNT])
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn landmark(&self, index: usize) -> Option<Vec2> {
        self.landmarks.get(index).copied()
    }

    /// Hands without a score are trusted.
    pub fn meets_confidence(&self, min: f32) -> bool {
        self.score.map_or(true, |s| s >= min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_hand_has_every_landmark() {
        let h = Hand::at_point(Vec2::new(3.0, 4.0));
        assert_eq!(h.landmarks.len(), landmarks::COUNT);
        assert_eq!(h.landmark(landmarks::MIDDLE_TIP), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn missing_landmark() {
        let h = Hand::new(vec![Vec2::ZERO; 5]);
        assert_eq!(h.landmark(landmarks::MIDDLE_TIP), None);
    }

    #[test]
    fn confidence_gate() {
        assert!(Hand::default().meets_confidence(0.8));
        assert!(Hand::default().with_score(0.8).meets_confidence(0.8));
        assert!(!Hand::default().with_score(0.5).meets_confidence(0.8));
    }
}
