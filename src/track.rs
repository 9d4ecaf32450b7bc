use anyhow::Result;

use crate::detection::Rect;
use crate::image::Image;
use crate::my_types::TrackId;

/// Capability for creating single-target trackers. Concrete visual trackers
/// (correlation filters etc.) live outside this crate; anything providing
/// these two operations can be plugged in.
pub trait TrackerBackend {
    fn init(&self, frame: &Image, rect: Rect) -> Result<Box<dyn TrackerHandle>>;
}

pub trait TrackerHandle {
    /// Predict the target box in a new frame. `None` means the target was
    /// lost and the handle is spent.
    fn update(&mut self, frame: &Image) -> Option<Rect>;
}

/// One persistent identity. The handle is owned exclusively and dropped
/// with the track, releasing any backend state.
pub struct Track {
    pub id: TrackId,
    /// Last successful prediction, or the initializing detection box.
    /// Positive-area as long as the track is alive.
    pub current_box: Rect,
    handle: Box<dyn TrackerHandle>,
}

impl Track {
    pub fn new(id: TrackId, handle: Box<dyn TrackerHandle>, rect: Rect) -> Self {
        Track {
            id,
            current_box: rect,
            handle,
        }
    }

    /// Advance the track to a new frame. Returns false when the target is
    /// lost, after which the track must be removed.
    pub fn predict(&mut self, frame: &Image) -> bool {
        match self.handle.update(frame) {
            Some(rect) => {
                self.current_box = rect;
                true
            }
            None => false,
        }
    }
}

/// Hold-box backend for demos and tests. It repeats the initialization box
/// verbatim and reports loss once that box leaves the frame; no visual state
/// estimation happens here.
pub struct StaticTracker;

impl TrackerBackend for StaticTracker {
    fn init(&self, _frame: &Image, rect: Rect) -> Result<Box<dyn TrackerHandle>> {
        Ok(Box::new(StaticHandle { rect }))
    }
}

struct StaticHandle {
    rect: Rect,
}

impl TrackerHandle for StaticHandle {
    fn update(&mut self, frame: &Image) -> Option<Rect> {
        let inside = self.rect.x >= 0.
            && self.rect.y >= 0.
            && self.rect.x + self.rect.width <= frame.width as f64
            && self.rect.y + self.rect.height <= frame.height as f64;
        if inside {
            Some(self.rect)
        } else {
            None
        }
    }
}
