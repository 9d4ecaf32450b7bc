use crate::camera::{guarded_div, LocationModel};
use crate::detection::Rect;
use crate::error::Error;
use crate::my_types::*;

/// Ground-plane estimator. The camera sits at a known height looking across
/// a flat floor; the vertical position of a box center in the image fixes
/// the dip angle to the target's foot point, and depth follows from the
/// mount height. The horizontal coordinate is scaled by an empirically
/// calibrated pixel-to-millimeter factor.
#[derive(Debug)]
pub struct GroundPlaneModel {
    /// (width, height) of the calibrated image in pixels
    resolution: (f64, f64),
    /// sensor pixel pitch in mm/px
    pixel_size: f64,
    /// camera height above the ground plane in meters
    mount_height: f64,
    /// focal length in mm
    focal_length: f64,
    /// vertical field of view in degrees
    vertical_fov: f64,
    /// empirical horizontal pixel-to-mm factor
    pixel_to_mm: f64,
}

impl GroundPlaneModel {
    pub fn new(
        resolution: ImageShape,
        pixel_size: f64,
        mount_height: f64,
        focal_length: f64,
        vertical_fov: f64,
        pixel_to_mm: f64,
    ) -> Result<Self, Error> {
        if resolution.0 == 0 || resolution.1 == 0 {
            return Err(Error::invalid_configuration(format!(
                "resolution must be positive, got {}x{}",
                resolution.0, resolution.1
            )));
        }
        if !(0. < vertical_fov && vertical_fov < 180.) {
            return Err(Error::invalid_configuration(format!(
                "vertical FOV must lie in (0, 180) degrees, got {}",
                vertical_fov
            )));
        }
        for (name, value) in [
            ("pixel size", pixel_size),
            ("mount height", mount_height),
            ("focal length", focal_length),
            ("pixel-to-mm factor", pixel_to_mm),
        ] {
            if value <= 0. {
                return Err(Error::invalid_configuration(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(GroundPlaneModel {
            resolution: (resolution.0 as f64, resolution.1 as f64),
            pixel_size,
            mount_height,
            focal_length,
            vertical_fov,
            pixel_to_mm,
        })
    }
}

impl LocationModel for GroundPlaneModel {
    fn locate(&self, rect: &Rect) -> Result<Vector3d, Error> {
        let center = rect.center();

        // vertical offset from the optical axis, on the sensor
        let offset = (center.y - self.resolution.1 / 2.) * self.pixel_size;
        let half_fov = self.vertical_fov / 2.;
        let dip = half_fov - offset.atan2(self.focal_length).to_degrees();
        // a box centered on the horizon row leaves tan(0) in the denominator
        let slope = (half_fov - dip).to_radians().tan();
        let z = guarded_div(self.mount_height, slope, "ground-plane depth")?;

        let x_from_center = (center.x - self.resolution.0 / 2.) * self.pixel_to_mm;
        let x = x_from_center * z / (self.focal_length * 1000.);

        Ok(Vector3d::new(x, self.mount_height, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deployment calibration: 1280x720, 0.0028 mm pixels, 0.762 m mount,
    /// 1.898 mm focal length, 56.34 degree vertical FOV.
    fn deployed() -> GroundPlaneModel {
        GroundPlaneModel::new((1280, 720), 0.0028, 0.762, 1.898, 56.34, 2.8).unwrap()
    }

    #[test]
    fn test_horizon_row_is_degenerate() {
        // box centered exactly at the image center
        let rect = Rect::new(640. - 30., 360. - 80., 60., 160.);
        assert!(matches!(
            deployed().locate(&rect),
            Err(Error::NumericDegeneracy { .. })
        ));
    }

    #[test]
    fn test_depth_shrinks_down_the_image() {
        // horizon row at 256 keeps all three samples below it
        let model = GroundPlaneModel::new((1280, 512), 0.0028, 0.762, 1.898, 56.34, 2.8).unwrap();
        let at = |cy: f64| Rect::new(640. - 25., cy - 50., 50., 100.);

        let z300 = model.locate(&at(300.)).unwrap().z;
        let z360 = model.locate(&at(360.)).unwrap().z;
        let z420 = model.locate(&at(420.)).unwrap().z;

        assert!(z300.is_finite() && z360.is_finite() && z420.is_finite());
        assert!(z300 > 0. && z360 > 0. && z420 > 0.);
        // lower in the image means closer to the camera
        assert!(z300 > z360);
        assert!(z360 > z420);
    }

    #[test]
    fn test_centered_column_has_zero_lateral_offset() {
        let rect = Rect::new(640. - 25., 500. - 50., 50., 100.);
        let location = deployed().locate(&rect).unwrap();
        assert!(location.x.abs() < 1e-12);
        assert!((location.y - 0.762).abs() < 1e-12);
        assert!(location.z > 0.);
    }

    #[test]
    fn test_lateral_sign_follows_image_side() {
        let model = deployed();
        let left = model
            .locate(&Rect::new(200. - 25., 500. - 50., 50., 100.))
            .unwrap();
        let right = model
            .locate(&Rect::new(1000. - 25., 500. - 50., 50., 100.))
            .unwrap();
        assert!(left.x < 0.);
        assert!(right.x > 0.);
    }

    #[test]
    fn test_rejects_bad_calibration() {
        assert!(GroundPlaneModel::new((1280, 720), 0.0028, 0.762, 1.898, 0., 2.8).is_err());
        assert!(GroundPlaneModel::new((1280, 720), 0.0028, 0.762, 1.898, 180., 2.8).is_err());
        assert!(GroundPlaneModel::new((1280, 720), 0.0028, 0.762, 1.898, -10., 2.8).is_err());
        assert!(GroundPlaneModel::new((1280, 720), 0.0028, 0.762, 0., 56.34, 2.8).is_err());
        assert!(GroundPlaneModel::new((1280, 720), 0., 0.762, 1.898, 56.34, 2.8).is_err());
        assert!(GroundPlaneModel::new((0, 720), 0.0028, 0.762, 1.898, 56.34, 2.8).is_err());
    }
}
