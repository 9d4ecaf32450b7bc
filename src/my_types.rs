use nalgebra as na;

pub type Vector2d = na::Vector2::<f64>;
pub type Vector3d = na::Vector3::<f64>;

/// Stable handle for a tracked target, never reused within a process
pub type TrackId = u64;

/// (width, height) in pixels
pub type ImageShape = (usize, usize);
