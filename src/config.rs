use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context as AnyhowContext, Result};
use serde::Deserialize;

use crate::camera::{Camera, CameraKind, LocationModel};
use crate::error::Error;
use crate::ground_plane::GroundPlaneModel;
use crate::pinhole::PinholeModel;

pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Runtime knobs. Camera calibration is deliberately not in here; it travels
/// as an explicit [`Camera`] value.
#[derive(Debug, Default)]
#[derive(clap::Parser)]
pub struct Config {
    #[clap(long, default_value = "0")]
    pub seed: u64,

    /// Localization strategy, "ground-plane" or "pinhole"
    #[clap(long, default_value = "ground-plane")]
    pub camera_model: String,

    /// Detections below this confidence never reach the tracker
    #[clap(long, default_value = "0.5")]
    pub min_confidence: f64,

    /// Number of synthetic frames when no scenario file is given
    #[clap(long, default_value = "300")]
    pub synthetic_frames: usize,
}

/// Calibration document, loadable from JSON. Field defaults are the original
/// deployment values and every one of them can be overridden.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub image_width: usize,
    pub image_height: usize,

    // intrinsic-projection parameters
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub assumed_target_width: f64,

    // ground-plane parameters
    pub pixel_size: f64,
    pub mount_height: f64,
    pub focal_length: f64,
    pub vertical_fov: f64,
    pub pixel_to_mm: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            image_width: 1280,
            image_height: 720,
            fx: 1000.,
            fy: 1000.,
            cx: 320.,
            cy: 240.,
            assumed_target_width: 1.,
            pixel_size: 0.0028,
            mount_height: 0.762,
            focal_length: 1.898,
            vertical_fov: 56.34,
            pixel_to_mm: 2.8,
        }
    }
}

impl CameraConfig {
    pub fn load(path: &Path) -> Result<CameraConfig> {
        let file = File::open(path)
            .with_context(|| format!("cannot open calibration file {}", path.display()))?;
        let config = serde_json::from_reader(file)
            .with_context(|| format!("malformed calibration file {}", path.display()))?;
        Ok(config)
    }

    /// Fail-fast validation happens inside the model constructors, before
    /// any frame is processed.
    pub fn build_camera(&self, kind: CameraKind) -> Result<Camera, Error> {
        let model: Box<dyn LocationModel> = match kind {
            CameraKind::Pinhole => Box::new(PinholeModel::new(
                self.fx,
                self.fy,
                self.cx,
                self.cy,
                self.assumed_target_width,
            )?),
            CameraKind::GroundPlane => Box::new(GroundPlaneModel::new(
                (self.image_width, self.image_height),
                self.pixel_size,
                self.mount_height,
                self.focal_length,
                self.vertical_fov,
                self.pixel_to_mm,
            )?),
        };
        Ok(Camera {
            kind,
            model,
            image_shape: (self.image_width, self.image_height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calibration_builds_both_models() {
        let config = CameraConfig::default();
        assert!(config.build_camera(CameraKind::GroundPlane).is_ok());
        assert!(config.build_camera(CameraKind::Pinhole).is_ok());
    }

    #[test]
    fn test_bad_calibration_fails_before_processing() {
        let config = CameraConfig {
            vertical_fov: -5.,
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.build_camera(CameraKind::GroundPlane),
            Err(Error::InvalidConfiguration { .. })
        ));

        let config = CameraConfig {
            fx: 0.,
            ..CameraConfig::default()
        };
        assert!(config.build_camera(CameraKind::Pinhole).is_err());
    }

    #[test]
    fn test_partial_calibration_document() {
        let config: CameraConfig =
            serde_json::from_str(r#"{"mount_height": 1.25, "vertical_fov": 60.0}"#).unwrap();
        assert!((config.mount_height - 1.25).abs() < 1e-12);
        assert!((config.vertical_fov - 60.).abs() < 1e-12);
        // untouched fields keep the deployment defaults
        assert!((config.focal_length - 1.898).abs() < 1e-12);
        assert_eq!(config.image_width, 1280);
    }
}
