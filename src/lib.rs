//! A CPU-rendered mesh viewer.
//!
//! A mesh is loaded from STL (or OBJ), fitted into the bi-unit cube and
//! shaded with a Phong model into an offscreen buffer. Each tick the
//! buffer is resampled and blitted to the screen of a small SDL2 game-loop
//! host. SDL2 is used only for the window; all rendering runs on the CPU.
//!
//! # Quick Start
//!
//! ```ignore
//! use phong_view::prelude::*;
//!
//! let config = ViewerConfig::default();
//! let scene = Scene::setup(&config)?;
//! let mut viewer = Viewer::new(scene, config.clone(), RandomJitter::new(rand::rng()));
//! run_game(&mut viewer, &RunOptions::from(&config))?;
//! ```

// Public API - exposed to library consumers
pub mod clipper;
pub mod colors;
pub mod config;
pub mod error;
pub mod game;
pub mod host;
pub mod jitter;
pub mod math;
pub mod mesh;
pub mod render;
pub mod resample;
pub mod scene;
pub mod stl;
pub mod surface;

// Re-export commonly needed types at crate root for convenience
pub use error::{HostError, MeshError, SetupError};
pub use game::{Game, Viewer};
pub use mesh::Mesh;
pub use scene::Scene;
pub use surface::Surface;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use phong_view::prelude::*;
/// ```
pub mod prelude {
    // Game loop
    pub use crate::game::{Game, Viewer};
    pub use crate::host::{run_game, RunOptions};
    pub use crate::jitter::{EyeJitter, FixedJitter, RandomJitter};

    // Scene
    pub use crate::config::ViewerConfig;
    pub use crate::mesh::{BoundingBox, Mesh};
    pub use crate::scene::Scene;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::colors::Color;
    pub use crate::render::{Cull, PhongShader, RenderContext, Shader};
    pub use crate::surface::{DrawOptions, Rect, Surface};
}
