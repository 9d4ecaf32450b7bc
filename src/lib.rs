pub mod camera;
pub mod config;
pub mod dataset;
pub mod detection;
pub mod detector;
pub mod error;
pub mod ground_plane;
pub mod image;
pub mod my_types;
pub mod pinhole;
pub mod pipeline;
pub mod track;
pub mod tracker;
pub mod visualization;
