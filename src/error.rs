//! Error types.
//!
//! Only two things can fail: loading the mesh during setup, and the SDL
//! host loop. Everything on the per-frame render path is infallible.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading a mesh file.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("binary STL truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("unsupported mesh format: {0:?}")]
    UnsupportedFormat(Option<String>),
    #[error("mesh contains no triangles")]
    Empty,
}

/// Fatal failure while preparing the scene.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to load mesh {path:?}: {source}")]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: MeshError,
    },
}

/// Fatal failure reported by the game-loop host.
///
/// SDL reports its failures as plain strings, so they are carried verbatim.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("SDL initialization failed: {0}")]
    Init(String),
    #[error("window creation failed: {0}")]
    Window(String),
    #[error("texture error: {0}")]
    Texture(String),
    #[error("presenting frame failed: {0}")]
    Present(String),
}
