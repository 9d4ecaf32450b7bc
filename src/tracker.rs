use log::{debug, warn};

use crate::detection::{Detection, Rect};
use crate::image::Image;
use crate::my_types::TrackId;
use crate::track::{Track, TrackerBackend};

/// Track association and lifecycle manager. Owns the ordered set of live
/// tracks; set order is association priority and is never re-sorted.
pub struct Tracker {
    backend: Box<dyn TrackerBackend>,
    tracks: Vec<Track>,
    next_id: TrackId,
}

impl Tracker {
    pub fn new(backend: Box<dyn TrackerBackend>) -> Self {
        Tracker {
            backend,
            tracks: vec![],
            next_id: 0,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Two strict phases per frame.
    ///
    /// Phase 1 updates every live track through its handle; a failed update
    /// removes the track on the spot, which is the only destruction path and
    /// is never surfaced as an error.
    ///
    /// Phase 2 walks the detections in input order and tests each for
    /// positive-area overlap against the updated set in stored order. The
    /// first hit wins and leaves the matched track untouched; a detection
    /// with no hit seeds a new track at the back of the set. Greedy
    /// first-overlap is the intended behavior, not an IoU-optimal
    /// assignment, and can mis-associate boxes that sit close together.
    pub fn process_frame(
        &mut self,
        frame: &Image,
        detections: &[Detection],
    ) -> Vec<(TrackId, Rect)> {
        self.tracks.retain_mut(|track| {
            let alive = track.predict(frame);
            if !alive {
                debug!("track {} lost its target, dropping", track.id);
            }
            alive
        });

        for detection in detections {
            if let Err(err) = detection.validate() {
                warn!("rejected at boundary: {}", err);
                continue;
            }
            let rect = detection.bounding_box;
            if self.tracks.iter().any(|t| t.current_box.overlaps(&rect)) {
                continue;
            }
            match self.backend.init(frame, rect) {
                Ok(handle) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    debug!("track {} started at {:?}", id, rect);
                    self.tracks.push(Track::new(id, handle, rect));
                }
                Err(err) => warn!("tracker init failed, detection skipped: {:#}", err),
            }
        }

        self.tracks
            .iter()
            .map(|t| (t.id, t.current_box))
            .collect()
    }
}
