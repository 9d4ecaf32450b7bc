use crate::error::Error;
use crate::my_types::*;

/// Axis-aligned pixel-space box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Vector2d {
        Vector2d::new(self.x + self.width / 2., self.y + self.height / 2.)
    }

    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let h = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        if w > 0. && h > 0. {
            w * h
        } else {
            0.
        }
    }

    /// Positive-area overlap. Boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0.
    }
}

/// One per-frame candidate from the external detector. Already
/// non-max-suppressed and confidence-filtered; not retained beyond the frame.
#[derive(Clone, Copy, Debug)]
pub struct Detection {
    pub bounding_box: Rect,
    pub confidence: f64,
}

impl Detection {
    pub fn new(bounding_box: Rect, confidence: f64) -> Detection {
        Detection {
            bounding_box,
            confidence,
        }
    }

    /// Boundary check; a zero-area box would break the track invariant
    pub fn validate(&self) -> Result<(), Error> {
        if self.bounding_box.width <= 0. || self.bounding_box.height <= 0. {
            return Err(Error::InvalidDetection {
                rect: self.bounding_box,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_commutative() {
        let a = Rect::new(0., 0., 10., 10.);
        let b = Rect::new(5., 5., 10., 10.);
        let c = Rect::new(20., 20., 5., 5.);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!((a.intersection_area(&b) - 25.).abs() < 1e-12);
        assert!((b.intersection_area(&a) - 25.).abs() < 1e-12);

        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_edge_contact_is_not_overlap() {
        let a = Rect::new(0., 0., 10., 10.);
        let b = Rect::new(10., 0., 10., 10.);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(0., 0., 100., 100.);
        let inner = Rect::new(40., 40., 10., 10.);
        assert!(outer.overlaps(&inner));
        assert!((outer.intersection_area(&inner) - inner.area()).abs() < 1e-12);
    }

    #[test]
    fn test_detection_validation() {
        assert!(Detection::new(Rect::new(0., 0., 10., 10.), 0.9)
            .validate()
            .is_ok());
        assert!(Detection::new(Rect::new(0., 0., 0., 10.), 0.9)
            .validate()
            .is_err());
        assert!(Detection::new(Rect::new(0., 0., 10., -1.), 0.9)
            .validate()
            .is_err());
    }
}
