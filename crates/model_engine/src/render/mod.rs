//! Rendering-side model pipeline
//!
//! Meshes come out of the asset parsers as pure data; this module turns
//! them into immutable, backend-cached renderables and defines the
//! abstraction a rendering backend implements to hold those caches.

pub mod backend;
pub mod backends;
pub mod compiled;
pub mod material;
pub mod mesh;

pub use backend::{BackendResult, DisplayListHandle, PrimitiveTopology, RenderBackend};
pub use compiled::CompiledModel;
pub use material::{Material, Rgba};
pub use mesh::{FacePoint, MaterialGroup, Mesh, Polygon, PolygonBatch};

use thiserror::Error;

/// Errors raised while compiling or replaying models
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend could not allocate a display list cache slot
    ///
    /// Fatal to the compilation in progress; construction of the owning
    /// entity aborts rather than producing a partial model.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// An operation was issued in a state that cannot serve it
    ///
    /// Raised for replay without a current rendering context, for handles
    /// that were already freed, and for malformed recording sequences.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
