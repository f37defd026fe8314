//! Programmable shading stages.
//!
//! The rasterizer is fixed-function; a [`Shader`] supplies the two stages
//! around it, like a GPU vertex/fragment program pair:
//!
//! - `vertex` maps a mesh vertex into clip space and emits the varyings
//!   the fragment stage needs (world position and normal).
//! - `fragment` receives the perspective-correct interpolation of those
//!   varyings for one pixel and returns its color, or `None` to discard.

use crate::clipper::ClipVertex;
use crate::colors::Color;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::mesh::Vertex;

pub trait Shader {
    fn vertex(&self, vertex: &Vertex) -> ClipVertex;
    fn fragment(&self, varyings: &ClipVertex) -> Option<Color>;
}

/// Flat color, no lighting. Mostly useful for silhouettes and tests.
pub struct SolidColorShader {
    matrix: Mat4,
    color: Color,
}

impl SolidColorShader {
    pub fn new(matrix: Mat4, color: Color) -> Self {
        Self { matrix, color }
    }
}

impl Shader for SolidColorShader {
    fn vertex(&self, vertex: &Vertex) -> ClipVertex {
        ClipVertex::new(
            self.matrix * Vec4::from_vec3(vertex.position, 1.0),
            vertex.position,
            vertex.normal,
        )
    }

    fn fragment(&self, _varyings: &ClipVertex) -> Option<Color> {
        Some(self.color)
    }
}

/// Phong lighting with a single directional light.
///
/// `light = ambient + diffuse * max(n·l, 0) + specular * max(v·r, 0)^power`,
/// and the fragment color is `object_color * light`, saturated at white,
/// keeping the object's alpha.
pub struct PhongShader {
    pub matrix: Mat4,
    /// Unit vector pointing towards the light.
    pub light_direction: Vec3,
    pub camera_position: Vec3,
    pub object_color: Color,
    pub ambient_color: Color,
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub specular_power: f32,
}

impl PhongShader {
    pub fn new(matrix: Mat4, light_direction: Vec3, camera_position: Vec3) -> Self {
        Self {
            matrix,
            light_direction: light_direction.normalize(),
            camera_position,
            object_color: Color::WHITE,
            ambient_color: Color::gray(0.2),
            diffuse_color: Color::gray(0.8),
            specular_color: Color::gray(1.0),
            specular_power: 32.0,
        }
    }
}

impl Shader for PhongShader {
    fn vertex(&self, vertex: &Vertex) -> ClipVertex {
        ClipVertex::new(
            self.matrix * Vec4::from_vec3(vertex.position, 1.0),
            vertex.position,
            vertex.normal,
        )
    }

    fn fragment(&self, varyings: &ClipVertex) -> Option<Color> {
        let normal = varyings.normal.normalize();
        let mut light = self.ambient_color;

        let diffuse = normal.dot(self.light_direction).max(0.0);
        light = light + self.diffuse_color * diffuse;

        if diffuse > 0.0 && self.specular_power > 0.0 {
            let to_camera = (self.camera_position - varyings.world).normalize();
            let reflected = (-self.light_direction).reflect(normal);
            let specular = to_camera.dot(reflected).max(0.0);
            if specular > 0.0 {
                light = light + self.specular_color * specular.powf(self.specular_power);
            }
        }

        let color = self.object_color;
        Some((color * light).min(Color::WHITE).with_alpha(color.a))
    }
}
