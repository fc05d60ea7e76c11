//! Concrete rendering backends

pub mod recording;

pub use recording::{DrawCommand, RecordingBackend};
