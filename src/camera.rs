use std::fmt::Debug;
use std::str::FromStr;

use crate::detection::Rect;
use crate::error::Error;
use crate::my_types::*;

/// Immutable camera value handed to the estimator by reference. Calibration
/// numbers live inside the model; nothing here is process-wide state.
#[derive(Debug)]
pub struct Camera {
    pub kind: CameraKind,
    pub model: Box<dyn LocationModel>,
    pub image_shape: ImageShape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraKind {
    Pinhole,
    GroundPlane,
}

impl FromStr for CameraKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "pinhole" => Ok(CameraKind::Pinhole),
            "ground-plane" => Ok(CameraKind::GroundPlane),
            other => Err(Error::invalid_configuration(format!(
                "unknown camera model \"{}\"",
                other
            ))),
        }
    }
}

/// Strategy for turning an image-space box into a robot-relative location.
/// The two shipped models are independent calibrations, not refinements of
/// each other, and are never combined.
pub trait LocationModel: Debug {
    fn locate(&self, rect: &Rect) -> Result<Vector3d, Error>;
}

impl Camera {
    pub fn locate(&self, rect: &Rect) -> Result<Vector3d, Error> {
        self.model.locate(rect)
    }
}

pub(crate) const DIV_EPSILON: f64 = 1e-9;

/// Shared guard for every estimator division; a ~0 denominator becomes an
/// explicit error instead of Inf/NaN.
pub(crate) fn guarded_div(num: f64, den: f64, context: &'static str) -> Result<f64, Error> {
    if den.abs() < DIV_EPSILON {
        return Err(Error::NumericDegeneracy { context });
    }
    Ok(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            CameraKind::from_str("ground-plane").unwrap(),
            CameraKind::GroundPlane
        );
        assert_eq!(CameraKind::from_str("pinhole").unwrap(), CameraKind::Pinhole);
        assert!(CameraKind::from_str("fisheye").is_err());
    }

    #[test]
    fn test_guarded_div() {
        assert!((guarded_div(1., 2., "test").unwrap() - 0.5).abs() < 1e-12);
        assert!(guarded_div(1., 1e-12, "test").is_err());
        assert!(guarded_div(1., 0., "test").is_err());
    }
}
