//! Polygon clipping against the homogeneous clip volume using the
//! Sutherland-Hodgman algorithm.

pub mod clip_space;

pub use clip_space::{ClipPlane, ClipPolygon, ClipVertex};
