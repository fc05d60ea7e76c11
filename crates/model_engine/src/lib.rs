//! # Model Engine
//!
//! Loading and compiled-draw caching for text-based 3D models.
//!
//! ## Features
//!
//! - **OBJ geometry loading**: vertex/normal tables with 1-based index
//!   resolution and material-grouped polygon batching
//! - **MTL material libraries**: ambient/diffuse/specular/emission color
//!   quadruples with Wavefront color expansion rules
//! - **Build-once/draw-many caching**: models compile into an immutable
//!   backend display list that replays without re-parsing
//! - **Procedural variants**: derive randomized meshes from a parsed base
//!   without re-reading the source file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use model_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mesh = ObjLoader::load_obj("assets/ship.obj")?;
//!
//!     let mut backend = RecordingBackend::new(64);
//!     let model = CompiledModel::compile(&mesh, &mut backend)?;
//!
//!     backend.make_current();
//!     model.draw(&mut backend)?; // replay the cached emission
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod foundation;
pub mod procedural;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetConfig, ModelAssets, ObjError, ObjLoader},
        assets::materials::{MtlError, MtlParser},
        foundation::math::Vec3,
        procedural::{perturb, UniformJitter, VertexJitter},
        render::{
            backends::RecordingBackend, CompiledModel, DisplayListHandle, Material, Mesh,
            PolygonBatch, PrimitiveTopology, RenderBackend, RenderError,
        },
    };
}
