use crate::camera::{guarded_div, LocationModel, DIV_EPSILON};
use crate::detection::Rect;
use crate::error::Error;
use crate::my_types::*;

/// Intrinsic-projection estimator. Normalizes the box center through the
/// pinhole intrinsics and reads depth off the apparent box width, assuming
/// targets share a known real-world width.
#[derive(Debug)]
pub struct PinholeModel {
    focal: Vector2d,
    principal: Vector2d,
    assumed_target_width: f64,
}

impl PinholeModel {
    pub fn new(
        fx: f64,
        fy: f64,
        cx: f64,
        cy: f64,
        assumed_target_width: f64,
    ) -> Result<Self, Error> {
        if fx.abs() < DIV_EPSILON || fy.abs() < DIV_EPSILON {
            return Err(Error::invalid_configuration(format!(
                "focal lengths must be nonzero, got ({}, {})",
                fx, fy
            )));
        }
        if assumed_target_width <= 0. {
            return Err(Error::invalid_configuration(format!(
                "assumed target width must be positive, got {}",
                assumed_target_width
            )));
        }
        Ok(PinholeModel {
            focal: Vector2d::new(fx, fy),
            principal: Vector2d::new(cx, cy),
            assumed_target_width,
        })
    }
}

impl LocationModel for PinholeModel {
    fn locate(&self, rect: &Rect) -> Result<Vector3d, Error> {
        let center = rect.center();
        let x = (center.x - self.principal.x) / self.focal.x;
        let y = (center.y - self.principal.y) / self.focal.y;
        // apparent width of a constant-width target is inversely
        // proportional to its distance
        let z = guarded_div(
            self.focal.x * self.assumed_target_width,
            rect.width,
            "pinhole depth",
        )?;
        Ok(Vector3d::new(x, y, z))
    }
}
