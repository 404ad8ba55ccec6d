//! Pixel-corner bounding boxes and their centroids.

mod common;

pub use xyxy::*;
pub mod xyxy;

pub use point::*;
pub mod point;
