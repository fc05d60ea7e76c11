//! In-memory recording backend
//!
//! A complete headless implementation of [`RenderBackend`]: display lists
//! are command vectors cached in slots keyed by id, and replaying a list
//! appends its commands to an inspectable log. It defines the reference
//! semantics for the backend contract and carries the test suite; a
//! GPU-backed implementation substitutes real list compilation behind the
//! same trait.

use std::collections::HashMap;

use crate::render::backend::{BackendResult, DisplayListHandle, PrimitiveTopology, RenderBackend};
use crate::render::material::Rgba;
use crate::render::RenderError;

/// One recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Bind ambient and diffuse colors for subsequent primitives
    BindMaterial {
        /// Ambient color
        ambient: Rgba,
        /// Diffuse color
        diffuse: Rgba,
    },
    /// Start a primitive run
    Begin(PrimitiveTopology),
    /// One point of the open primitive
    Point {
        /// Point normal, submitted before the position
        normal: [f32; 3],
        /// Point position
        position: [f32; 3],
    },
    /// End the open primitive run
    End,
}

struct Recording {
    id: u64,
    commands: Vec<DrawCommand>,
}

/// Headless display-list backend recording commands into memory
pub struct RecordingBackend {
    lists: HashMap<u64, Vec<DrawCommand>>,
    next_list_id: u64,
    max_lists: usize,
    recording: Option<Recording>,
    open_topology: Option<PrimitiveTopology>,
    context_current: bool,
    replayed: Vec<DrawCommand>,
}

impl RecordingBackend {
    /// Create a backend with capacity for `max_lists` cached lists
    pub fn new(max_lists: usize) -> Self {
        Self {
            lists: HashMap::new(),
            next_list_id: 1,
            max_lists,
            recording: None,
            open_topology: None,
            context_current: false,
            replayed: Vec::new(),
        }
    }

    /// Mark a rendering context as current, enabling replay
    pub fn make_current(&mut self) {
        self.context_current = true;
    }

    /// Drop the current rendering context; replay fails until it returns
    pub fn release_current(&mut self) {
        self.context_current = false;
    }

    /// Commands replayed by `call_list` so far, in submission order
    pub fn replayed(&self) -> &[DrawCommand] {
        &self.replayed
    }

    /// Forget the replay log, keeping all cached lists
    pub fn clear_replayed(&mut self) {
        self.replayed.clear();
    }

    /// Number of cached lists currently held
    pub fn cached_lists(&self) -> usize {
        self.lists.len()
    }

    /// Commands recorded into a cached list, if the handle is live
    pub fn list_commands(&self, handle: DisplayListHandle) -> Option<&[DrawCommand]> {
        self.lists.get(&handle.0).map(Vec::as_slice)
    }

    fn open_recording(&mut self) -> BackendResult<&mut Recording> {
        self.recording
            .as_mut()
            .ok_or_else(|| RenderError::InvalidState("no display list is being recorded".into()))
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_list(&mut self) -> BackendResult<DisplayListHandle> {
        if self.recording.is_some() {
            return Err(RenderError::InvalidState(
                "a display list is already being recorded".into(),
            ));
        }
        if self.lists.len() >= self.max_lists {
            return Err(RenderError::ResourceExhausted(format!(
                "display list capacity of {} reached",
                self.max_lists
            )));
        }
        let id = self.next_list_id;
        self.next_list_id += 1;
        self.recording = Some(Recording {
            id,
            commands: Vec::new(),
        });
        log::debug!("Recording display list {}", id);
        Ok(DisplayListHandle(id))
    }

    fn end_list(&mut self) -> BackendResult<()> {
        if self.open_topology.is_some() {
            return Err(RenderError::InvalidState(
                "display list ended inside an open primitive".into(),
            ));
        }
        let recording = self
            .recording
            .take()
            .ok_or_else(|| RenderError::InvalidState("no display list is being recorded".into()))?;
        log::debug!(
            "Cached display list {} ({} commands)",
            recording.id,
            recording.commands.len()
        );
        self.lists.insert(recording.id, recording.commands);
        Ok(())
    }

    fn bind_material(&mut self, ambient: Rgba, diffuse: Rgba) -> BackendResult<()> {
        if self.open_topology.is_some() {
            return Err(RenderError::InvalidState(
                "material bound inside an open primitive".into(),
            ));
        }
        self.open_recording()?
            .commands
            .push(DrawCommand::BindMaterial { ambient, diffuse });
        Ok(())
    }

    fn begin_primitive(&mut self, topology: PrimitiveTopology) -> BackendResult<()> {
        if self.open_topology.is_some() {
            return Err(RenderError::InvalidState(
                "previous primitive is still open".into(),
            ));
        }
        self.open_recording()?
            .commands
            .push(DrawCommand::Begin(topology));
        self.open_topology = Some(topology);
        Ok(())
    }

    fn emit(&mut self, normal: [f32; 3], position: [f32; 3]) -> BackendResult<()> {
        if self.open_topology.is_none() {
            return Err(RenderError::InvalidState(
                "vertex emitted outside a primitive".into(),
            ));
        }
        self.open_recording()?
            .commands
            .push(DrawCommand::Point { normal, position });
        Ok(())
    }

    fn end_primitive(&mut self) -> BackendResult<()> {
        if self.open_topology.take().is_none() {
            return Err(RenderError::InvalidState("no primitive is open".into()));
        }
        self.open_recording()?.commands.push(DrawCommand::End);
        Ok(())
    }

    fn call_list(&mut self, handle: DisplayListHandle) -> BackendResult<()> {
        if !self.context_current {
            return Err(RenderError::InvalidState(
                "no rendering context is current".into(),
            ));
        }
        let commands = self.lists.get(&handle.0).ok_or_else(|| {
            RenderError::InvalidState(format!("display list {} is not cached", handle.0))
        })?;
        self.replayed.extend(commands.iter().cloned());
        Ok(())
    }

    fn free_list(&mut self, handle: DisplayListHandle) -> BackendResult<()> {
        self.lists.remove(&handle.0).ok_or_else(|| {
            RenderError::InvalidState(format!("display list {} is not cached", handle.0))
        })?;
        log::debug!("Freed display list {}", handle.0);
        Ok(())
    }
}
