use anyhow::Result;
use log::warn;

use crate::camera::Camera;
use crate::detection::Rect;
use crate::detector::Detector;
use crate::image::Image;
use crate::my_types::*;
use crate::track::TrackerBackend;
use crate::tracker::Tracker;

/// One annotated record per live track, emitted every frame.
#[derive(Clone, Debug)]
pub struct TrackedHuman {
    pub id: TrackId,
    pub rect: Rect,
    /// Robot-relative location; None when the estimate was degenerate for
    /// this box.
    pub location: Option<Vector3d>,
}

/// Thin per-frame orchestrator: detector, then track lifecycle, then one
/// location estimate per surviving track. Frame-synchronous, single owner
/// of the track set.
pub struct Pipeline {
    detector: Box<dyn Detector>,
    tracker: Tracker,
    camera: Camera,
    // Incremented just before processing a new frame. 0 before the first frame.
    frame_number: usize,
}

impl Pipeline {
    pub fn new(
        detector: Box<dyn Detector>,
        backend: Box<dyn TrackerBackend>,
        camera: Camera,
    ) -> Self {
        Pipeline {
            detector,
            tracker: Tracker::new(backend),
            camera,
            frame_number: 0,
        }
    }

    pub fn frame_number(&self) -> usize {
        self.frame_number
    }

    pub fn process_frame(&mut self, frame: &Image) -> Result<Vec<TrackedHuman>> {
        self.frame_number += 1;

        let detections = self.detector.detect(frame)?;
        let boxes = self.tracker.process_frame(frame, &detections);

        let mut humans = Vec::with_capacity(boxes.len());
        for (id, rect) in boxes {
            // a degenerate estimate affects this record only
            let location = match self.camera.locate(&rect) {
                Ok(location) => Some(location),
                Err(err) => {
                    warn!("no location for track {}: {}", id, err);
                    None
                }
            };
            humans.push(TrackedHuman { id, rect, location });
        }
        Ok(humans)
    }
}
