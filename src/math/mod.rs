//! Vector and matrix types used by the render pipeline.

pub mod mat4;
pub mod vec3;
pub mod vec4;
