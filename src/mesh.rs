//! Triangle meshes and the geometric clean-up applied before rendering.

use std::collections::HashMap;
use std::path::Path;

use crate::error::MeshError;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::stl;

/// A mesh vertex: position plus shading normal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// A triangle with its own copy of its three vertices.
///
/// Front faces wind counter-clockwise when viewed from outside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Builds a triangle whose vertex normals are all set to the face normal.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = Self::face_normal(p0, p1, p2);
        Self {
            vertices: [
                Vertex::new(p0, normal),
                Vertex::new(p1, normal),
                Vertex::new(p2, normal),
            ],
        }
    }

    fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
        (p1 - p0).cross(p2 - p0).normalize()
    }

    /// Geometric normal derived from the winding order.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        Self::face_normal(a.position, b.position, c.position)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The box [-1, 1]^3.
    pub fn bi_unit() -> Self {
        Self::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        self.anchor(Vec3::new(0.5, 0.5, 0.5))
    }

    /// Point inside the box at the given fractional position per axis.
    pub fn anchor(&self, anchor: Vec3) -> Vec3 {
        self.min + self.size().mul_elem(anchor)
    }

    /// Returns true if `p` is inside the box, allowing for `epsilon` slack.
    pub fn contains(&self, p: Vec3, epsilon: f32) -> bool {
        p.x >= self.min.x - epsilon
            && p.y >= self.min.y - epsilon
            && p.z >= self.min.z - epsilon
            && p.x <= self.max.x + epsilon
            && p.y <= self.max.y + epsilon
            && p.z <= self.max.z + epsilon
    }
}

pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Load a mesh from disk, choosing the reader from the file extension.
    ///
    /// `.stl` (binary or ASCII) and `.obj` are supported.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let mesh = match extension.as_deref() {
            Some("stl") => Self::new(stl::load_stl(path)?),
            Some("obj") => Self::from_obj(path)?,
            _ => return Err(MeshError::UnsupportedFormat(extension)),
        };

        if mesh.triangles.is_empty() {
            return Err(MeshError::Empty);
        }
        Ok(mesh)
    }

    /// Load every model in an OBJ file into a single triangle soup.
    fn from_obj(path: &Path) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut triangles = Vec::new();
        for model in &models {
            let mesh = &model.mesh;
            let position = |i: usize| {
                Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                )
            };
            let has_normals = mesh.normals.len() == mesh.positions.len();

            for face in mesh.indices.chunks_exact(3) {
                let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
                let mut triangle = Triangle::new(position(a), position(b), position(c));
                if has_normals {
                    for (vertex, &i) in triangle.vertices.iter_mut().zip(&[a, b, c]) {
                        vertex.normal = Vec3::new(
                            mesh.normals[3 * i],
                            mesh.normals[3 * i + 1],
                            mesh.normals[3 * i + 2],
                        )
                        .normalize();
                    }
                }
                triangles.push(triangle);
            }
        }

        log::debug!(
            "loaded {} triangles from {} OBJ model(s) in {:?}",
            triangles.len(),
            models.len(),
            path
        );
        Ok(Self::new(triangles))
    }

    /// An axis-aligned cube centered on the origin.
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        // (outward normal, tangent, bitangent) per face
        let faces = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ];

        let mut triangles = Vec::with_capacity(12);
        for (normal, u, v) in faces {
            let center = normal * h;
            let corner = |su: f32, sv: f32| center + u * (su * h) + v * (sv * h);
            let quad = [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ];
            for [a, b, c] in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
                let mut triangle = Triangle::new(a, b, c);
                if triangle.normal().dot(normal) < 0.0 {
                    triangle = Triangle::new(a, c, b);
                }
                triangles.push(triangle);
            }
        }
        Self::new(triangles)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut min = Vec3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vec3::new(f32::MIN, f32::MIN, f32::MIN);
        for vertex in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            min = min.min(vertex.position);
            max = max.max(vertex.position);
        }
        BoundingBox::new(min, max)
    }

    /// Apply an affine transform to every vertex.
    ///
    /// Normals are transformed as directions and renormalized, which is only
    /// correct for rotations, translations and uniform scales.
    pub fn transform(&mut self, matrix: &Mat4) {
        for vertex in self.triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            vertex.position = matrix.transform_point(vertex.position);
            vertex.normal = matrix.transform_direction(vertex.normal).normalize();
        }
    }

    /// Uniformly scale and translate the mesh so it fits inside `bounds`.
    ///
    /// Leftover space along the non-limiting axes is distributed according
    /// to `anchor` (0.5 centers the mesh).
    pub fn fit_inside(&mut self, bounds: BoundingBox, anchor: Vec3) {
        if self.triangles.is_empty() {
            return;
        }
        let current = self.bounding_box();
        let mut scale = bounds.size().div_elem(current.size()).min_component();
        if !scale.is_finite() {
            scale = 1.0;
        }
        let extra = bounds.size() - current.size() * scale;
        let matrix = Mat4::translation(bounds.min + extra.mul_elem(anchor))
            * Mat4::scaling(Vec3::new(scale, scale, scale))
            * Mat4::translation(-current.min);
        self.transform(&matrix);
    }

    /// Fit the mesh inside a bi-unit cube centered at the origin.
    pub fn bi_unit_cube(&mut self) {
        self.fit_inside(BoundingBox::bi_unit(), Vec3::new(0.5, 0.5, 0.5));
    }

    /// Average vertex normals across all faces sharing a position.
    pub fn smooth_normals(&mut self) {
        self.smooth_normals_with(|_, _| true);
    }

    /// Average vertex normals across faces sharing a position, but only
    /// between normals within `angle` radians of each other. Keeps hard
    /// edges (like the corners of a cube) sharp.
    pub fn smooth_normals_threshold(&mut self, angle: f32) {
        let threshold = angle.cos();
        self.smooth_normals_with(|own, other| own.dot(other) >= threshold);
    }

    fn smooth_normals_with<F>(&mut self, accept: F)
    where
        F: Fn(Vec3, Vec3) -> bool,
    {
        let mut lookup: HashMap<[u32; 3], Vec<Vec3>> = HashMap::new();
        for vertex in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            lookup
                .entry(position_key(vertex.position))
                .or_default()
                .push(vertex.normal);
        }

        for vertex in self.triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            let own = vertex.normal;
            let Some(normals) = lookup.get(&position_key(vertex.position)) else {
                continue;
            };
            let sum = normals
                .iter()
                .filter(|&&n| accept(own, n))
                .fold(Vec3::ZERO, |acc, &n| acc + n);
            vertex.normal = sum.normalize();
        }
    }
}

/// Hashable key for an exact vertex position. `-0.0` and `0.0` share a key.
fn position_key(p: Vec3) -> [u32; 3] {
    let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}
