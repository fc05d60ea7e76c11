//! Math utilities and types
//!
//! Provides the fundamental math types used by the geometry pipeline.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;
