use std::collections::VecDeque;

use anyhow::Result;

use crate::detection::Detection;
use crate::image::Image;

/// Detection capability. Implementations hand over per-frame candidates that
/// are already non-max-suppressed; the confidence floor is applied on this
/// side of the boundary as well.
pub trait Detector {
    fn detect(&mut self, frame: &Image) -> Result<Vec<Detection>>;
}

/// Replays prerecorded detection lists, one per frame, in order. Stands in
/// for the neural detector when running scenarios.
pub struct ScriptedDetector {
    frames: VecDeque<Vec<Detection>>,
    min_confidence: f64,
}

impl ScriptedDetector {
    pub fn new(frames: Vec<Vec<Detection>>, min_confidence: f64) -> Self {
        ScriptedDetector {
            frames: frames.into(),
            min_confidence,
        }
    }
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, _frame: &Image) -> Result<Vec<Detection>> {
        let detections = self.frames.pop_front().unwrap_or_default();
        Ok(detections
            .into_iter()
            .filter(|d| d.confidence >= self.min_confidence)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Rect;

    #[test]
    fn test_replay_applies_confidence_floor() {
        let frames = vec![
            vec![
                Detection::new(Rect::new(0., 0., 10., 10.), 0.9),
                Detection::new(Rect::new(20., 0., 10., 10.), 0.3),
            ],
            vec![],
        ];
        let mut detector = ScriptedDetector::new(frames, 0.5);
        let frame = Image::filled((64, 64), 0);

        let first = detector.detect(&frame).unwrap();
        assert_eq!(first.len(), 1);
        assert!(detector.detect(&frame).unwrap().is_empty());
        // past the end of the script there is nothing to report
        assert!(detector.detect(&frame).unwrap().is_empty());
    }
}
