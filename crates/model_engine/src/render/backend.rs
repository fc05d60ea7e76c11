//! Backend abstraction for compiled-draw caching
//!
//! This module defines the trait a rendering backend must implement so the
//! high-level model pipeline can record a model's emission once into a
//! cached display list and replay it every frame afterwards.

use crate::render::material::Rgba;
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a display list cached in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayListHandle(pub u64);

/// Primitive topologies a model emission is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Independent triangles, three points each
    Triangles,
    /// Independent quadrilaterals, four points each
    Quads,
    /// A single polygon of arbitrary arity
    Polygon,
}

/// Display-list style rendering backend
///
/// Recording (`begin_list` through `end_list`) captures a command stream
/// into a cache slot owned by the backend; it does not require a rendering
/// context. Replay (`call_list`) does, and fails with
/// [`RenderError::InvalidState`] when no context is current or the handle
/// has been freed.
///
/// Between `begin_primitive` and `end_primitive` the caller emits one
/// normal/position pair per point, normal first, matching fixed-function
/// vertex submission order.
pub trait RenderBackend {
    /// Allocate a cache slot and start recording into it
    ///
    /// Fails with [`RenderError::ResourceExhausted`] when the backend
    /// cannot allocate another slot. That failure is fatal to the
    /// compilation in progress and is not retried.
    fn begin_list(&mut self) -> BackendResult<DisplayListHandle>;

    /// Finish recording the list opened by `begin_list`
    fn end_list(&mut self) -> BackendResult<()>;

    /// Record a material binding; only ambient and diffuse are applied
    fn bind_material(&mut self, ambient: Rgba, diffuse: Rgba) -> BackendResult<()>;

    /// Record the start of a primitive run
    fn begin_primitive(&mut self, topology: PrimitiveTopology) -> BackendResult<()>;

    /// Record one point of the open primitive, normal before position
    fn emit(&mut self, normal: [f32; 3], position: [f32; 3]) -> BackendResult<()>;

    /// Record the end of the open primitive run
    fn end_primitive(&mut self) -> BackendResult<()>;

    /// Replay a previously recorded list
    fn call_list(&mut self, handle: DisplayListHandle) -> BackendResult<()>;

    /// Free a recorded list's cache slot
    ///
    /// The handle is invalid afterwards; replaying it fails with
    /// [`RenderError::InvalidState`].
    fn free_list(&mut self, handle: DisplayListHandle) -> BackendResult<()>;
}
