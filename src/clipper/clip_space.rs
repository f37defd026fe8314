//! Clip-space clipping against the homogeneous clip cube.
//!
//! Clipping occurs after the vertex shader (in homogeneous clip space),
//! before the perspective divide. The clip volume is defined by:
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w   (OpenGL-style [-1, 1] depth range)
//! ```

use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

/// A vertex in homogeneous clip space with the varyings the fragment
/// stage interpolates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipVertex {
    /// Position in clip space (x, y, z, w) - before perspective divide
    pub position: Vec4,
    /// World-space position, used for view-dependent lighting
    pub world: Vec3,
    /// World-space normal (not necessarily unit length after interpolation)
    pub normal: Vec3,
}

impl ClipVertex {
    pub fn new(position: Vec4, world: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            world,
            normal,
        }
    }

    /// Linearly interpolate all attributes between two vertices.
    /// Used when a polygon edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            world: self.world.lerp(other.world, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }

    /// Barycentric blend of three vertices' varyings. The clip position is
    /// left at the default since it is not needed past rasterization.
    pub fn blend(v: [&Self; 3], lambda: [f32; 3]) -> Self {
        Self {
            position: Vec4::default(),
            world: v[0].world * lambda[0] + v[1].world * lambda[1] + v[2].world * lambda[2],
            normal: v[0].normal * lambda[0] + v[1].normal * lambda[1] + v[2].normal * lambda[2],
        }
    }
}

/// The 6 planes of the canonical clip-space cube.
///
/// The signed distance is positive when inside the clip volume.
#[derive(Clone, Copy, Debug)]
pub enum ClipPlane {
    Left,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

impl ClipPlane {
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
        ClipPlane::Near,
        ClipPlane::Far,
    ];

    /// Returns the signed distance from a vertex to this plane.
    pub fn signed_distance(&self, v: &ClipVertex) -> f32 {
        let p = v.position;
        match self {
            Self::Left => p.w + p.x,   // x >= -w
            Self::Right => p.w - p.x,  // x <= w
            Self::Bottom => p.w + p.y, // y >= -w
            Self::Top => p.w - p.y,    // y <= w
            Self::Near => p.w + p.z,   // z >= -w
            Self::Far => p.w - p.z,    // z <= w
        }
    }
}

/// A convex polygon in clip space.
///
/// Intermediate representation during clipping; fan-triangulated back into
/// triangles for rasterization.
pub struct ClipPolygon {
    pub vertices: Vec<ClipVertex>,
}

impl ClipPolygon {
    pub fn from_triangle(v: [ClipVertex; 3]) -> Self {
        Self {
            vertices: v.to_vec(),
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// True when every vertex is inside every plane, so clipping is a no-op.
    pub fn is_inside(&self) -> bool {
        self.vertices.iter().all(|v| {
            ClipPlane::ALL
                .iter()
                .all(|plane| plane.signed_distance(v) >= 0.0)
        })
    }

    /// Clip against a single plane (Sutherland-Hodgman).
    pub fn clip_against_plane(&self, plane: ClipPlane) -> Self {
        if self.is_empty() {
            return Self { vertices: vec![] };
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);

        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];

            let d1 = plane.signed_distance(current);
            let d2 = plane.signed_distance(next);

            if d1 >= 0.0 {
                output.push(*current);
                if d2 < 0.0 {
                    output.push(current.lerp(next, d1 / (d1 - d2)));
                }
            } else if d2 >= 0.0 {
                output.push(current.lerp(next, d1 / (d1 - d2)));
            }
        }

        Self { vertices: output }
    }

    /// Clip against all 6 planes of the clip cube.
    pub fn clip(self) -> Self {
        if self.is_inside() {
            return self;
        }
        let mut result = self;
        for plane in ClipPlane::ALL {
            if result.is_empty() {
                break;
            }
            result = result.clip_against_plane(plane);
        }
        result
    }

    /// Fan triangulation of the (convex) polygon.
    pub fn triangulate(&self) -> impl Iterator<Item = [ClipVertex; 3]> + '_ {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [self.vertices[0], self.vertices[i], self.vertices[i + 1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> ClipVertex {
        ClipVertex::new(Vec4::new(x, y, z, 1.0), Vec3::new(x, y, z), Vec3::UP)
    }

    #[test]
    fn inside_triangle_is_untouched() {
        let polygon =
            ClipPolygon::from_triangle([vertex(0.0, 0.0, 0.0), vertex(0.5, 0.0, 0.0), vertex(0.0, 0.5, 0.0)]);
        let clipped = polygon.clip();
        assert_eq!(clipped.vertices.len(), 3);
        assert_eq!(clipped.triangulate().count(), 1);
    }

    #[test]
    fn crossing_right_plane_adds_vertex() {
        let polygon =
            ClipPolygon::from_triangle([vertex(0.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0), vertex(0.0, 0.5, 0.0)]);
        let clipped = polygon.clip();
        assert_eq!(clipped.vertices.len(), 4);
        assert!(clipped.vertices.iter().all(|v| v.position.x <= 1.0 + 1e-6));
        // Attributes are interpolated along with position
        assert!(clipped.vertices.iter().all(|v| (v.world.x - v.position.x).abs() < 1e-6));
    }

    #[test]
    fn fully_outside_triangle_is_dropped() {
        let polygon =
            ClipPolygon::from_triangle([vertex(2.0, 0.0, 0.0), vertex(3.0, 0.0, 0.0), vertex(2.0, 0.5, 0.0)]);
        assert!(polygon.clip().is_empty());
    }
}
