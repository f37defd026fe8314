//! The scene: a mesh plus the camera, light and material that render it.

use crate::colors::Color;
use crate::config::ViewerConfig;
use crate::error::SetupError;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;

pub struct Scene {
    pub mesh: Mesh,
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    pub fovy_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Unit vector towards the light.
    pub light: Vec3,
    pub color: Color,
}

impl Scene {
    /// Build a scene around an already prepared mesh, taking the camera,
    /// light and color from `config`.
    pub fn new(mesh: Mesh, config: &ViewerConfig) -> Self {
        Self {
            mesh,
            eye: config.eye,
            center: config.center,
            up: config.up,
            fovy_degrees: config.fovy_degrees,
            near: config.near,
            far: config.far,
            light: config.light.normalize(),
            color: config.object_color,
        }
    }

    /// Load the configured mesh, fit it into the bi-unit cube and smooth its
    /// normals.
    pub fn setup(config: &ViewerConfig) -> Result<Self, SetupError> {
        let path = &config.mesh_path;
        let mut mesh = Mesh::load(path).map_err(|source| SetupError::MeshLoad {
            path: path.clone(),
            source,
        })?;

        let original = mesh.bounding_box();
        mesh.bi_unit_cube();
        mesh.smooth_normals_threshold(config.smoothing_angle_degrees.to_radians());

        log::info!(
            "loaded {:?}: {} triangles, bounds {:?} .. {:?}",
            path,
            mesh.len(),
            original.min,
            original.max
        );
        Ok(Self::new(mesh, config))
    }

    /// Perspective * view for the current eye.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fovy_degrees, aspect, self.near, self.far)
            * Mat4::look_at(self.eye, self.center, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use crate::mesh::BoundingBox;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("phong-view-{}-{name}", std::process::id()))
    }

    #[test]
    fn setup_normalizes_loaded_mesh() {
        let path = temp_path("scene.stl");
        std::fs::write(
            &path,
            "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 10 0 0\nvertex 0 5 0\nendloop\nendfacet\nendsolid t\n",
        )
        .unwrap();

        let config = ViewerConfig {
            mesh_path: path.clone(),
            ..ViewerConfig::default()
        };
        let scene = Scene::setup(&config).unwrap();
        std::fs::remove_file(&path).unwrap();

        let bounds = scene.mesh.bounding_box();
        assert!(BoundingBox::bi_unit().contains(bounds.min, 1e-5));
        assert!(BoundingBox::bi_unit().contains(bounds.max, 1e-5));
        assert_relative_eq!(bounds.max.x - bounds.min.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(scene.light.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn setup_fails_for_missing_mesh() {
        let config = ViewerConfig {
            mesh_path: temp_path("does-not-exist.stl"),
            ..ViewerConfig::default()
        };
        let err = Scene::setup(&config).err().unwrap();
        assert!(matches!(err, SetupError::MeshLoad { .. }));
    }

    #[test]
    fn setup_fails_for_malformed_mesh() {
        let path = temp_path("broken.stl");
        std::fs::write(&path, "solid t\nfacet normal 0 0 1\nvertex 1 2\n").unwrap();
        let config = ViewerConfig {
            mesh_path: path.clone(),
            ..ViewerConfig::default()
        };
        let result = Scene::setup(&config);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn view_projection_looks_at_center() {
        let scene = Scene::new(Mesh::cube(0.5), &ViewerConfig::default());
        let clip = scene.view_projection(4.0 / 3.0) * Vec4::from_vec3(scene.center, 1.0);
        let ndc = clip.to_ndc();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
