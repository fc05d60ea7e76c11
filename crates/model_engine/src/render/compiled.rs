//! Compiled, replayable models
//!
//! [`CompiledModel`] walks a parsed [`Mesh`] exactly once, recording its
//! emission into a backend display list. The mesh is not retained; drawing
//! replays the cached list without touching the geometry again. Compiling
//! performs backend resource allocation, so it belongs in entity
//! construction, never inside the per-frame loop.

use crate::render::backend::{DisplayListHandle, PrimitiveTopology, RenderBackend};
use crate::render::mesh::{Mesh, Polygon};
use crate::render::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelState {
    Built,
    Released,
}

/// An immutable renderable compiled from one mesh
///
/// Owns its backend cache slot exclusively: no two models share a list.
/// The only state transition after construction is [`release`], which
/// frees the slot and permanently retires the model.
///
/// [`release`]: CompiledModel::release
#[derive(Debug)]
pub struct CompiledModel {
    list: DisplayListHandle,
    state: ModelState,
}

impl CompiledModel {
    /// Record a mesh's emission into a fresh backend display list
    ///
    /// Groups are visited in the mesh's first-use order. For each group the
    /// material's ambient and diffuse colors are bound (the sentinel group
    /// binds nothing), then triangles are recorded as one run, quads as one
    /// run, and every general polygon as its own run.
    ///
    /// # Errors
    /// [`RenderError::ResourceExhausted`] when the backend cannot allocate
    /// a cache slot; any recording failure is likewise fatal and leaves no
    /// half-built model behind.
    pub fn compile(mesh: &Mesh, backend: &mut dyn RenderBackend) -> Result<Self, RenderError> {
        let list = backend.begin_list()?;

        for group in mesh.groups() {
            if let Some(material) = &group.material {
                // TODO: bind specular and emission once the lighting pass
                // reads them; today only ambient and diffuse are applied.
                backend.bind_material(material.ambient, material.diffuse)?;
            }

            if !group.batch.triangles.is_empty() {
                backend.begin_primitive(PrimitiveTopology::Triangles)?;
                for triangle in &group.batch.triangles {
                    emit_points(mesh, triangle, backend)?;
                }
                backend.end_primitive()?;
            }

            if !group.batch.quads.is_empty() {
                backend.begin_primitive(PrimitiveTopology::Quads)?;
                for quad in &group.batch.quads {
                    emit_points(mesh, quad, backend)?;
                }
                backend.end_primitive()?;
            }

            for polygon in &group.batch.polygons {
                backend.begin_primitive(PrimitiveTopology::Polygon)?;
                emit_points(mesh, polygon, backend)?;
                backend.end_primitive()?;
            }
        }

        backend.end_list()?;
        log::debug!(
            "Compiled model: {} group(s), {} polygon(s) into display list {}",
            mesh.groups().len(),
            mesh.polygon_count(),
            list.0
        );

        Ok(Self {
            list,
            state: ModelState::Built,
        })
    }

    /// Replay the cached emission
    ///
    /// Valid any number of times once a rendering context is current; never
    /// mutates the model.
    ///
    /// # Errors
    /// [`RenderError::InvalidState`] when the model has been released or
    /// the backend has no current context.
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        if self.state == ModelState::Released {
            return Err(RenderError::InvalidState(
                "model has been released".into(),
            ));
        }
        backend.call_list(self.list)
    }

    /// Free the backend cache slot and retire the model
    ///
    /// # Errors
    /// [`RenderError::InvalidState`] when the model was already released.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        if self.state == ModelState::Released {
            return Err(RenderError::InvalidState(
                "model has already been released".into(),
            ));
        }
        backend.free_list(self.list)?;
        self.state = ModelState::Released;
        Ok(())
    }
}

fn emit_points(
    mesh: &Mesh,
    polygon: &Polygon,
    backend: &mut dyn RenderBackend,
) -> Result<(), RenderError> {
    for point in polygon {
        let normal = mesh.normals()[point.normal as usize];
        let position = mesh.vertices()[point.vertex as usize];
        backend.emit(normal.into(), position.into())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::backends::recording::{DrawCommand, RecordingBackend};
    use crate::render::mesh::FacePoint;
    use crate::render::Material;

    fn sample_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        for i in 0..5 {
            mesh.push_vertex(Vec3::new(i as f32, 0.0, 0.0));
            mesh.push_normal(Vec3::new(0.0, 0.0, 1.0));
        }
        let hull = Material::new([0.2; 4], [0.8; 4], [0.0; 4], [0.0; 4]);
        let face = |n: u32| -> Vec<FacePoint> {
            (0..n).map(|i| FacePoint { vertex: i, normal: i }).collect()
        };
        mesh.push_polygon(Some(("hull", &hull)), face(3));
        mesh.push_polygon(Some(("hull", &hull)), face(4));
        mesh.push_polygon(Some(("hull", &hull)), face(5));
        mesh
    }

    #[test]
    fn test_compile_records_expected_sequence() {
        let mesh = sample_mesh();
        let mut backend = RecordingBackend::new(4);
        let model = CompiledModel::compile(&mesh, &mut backend).unwrap();

        backend.make_current();
        model.draw(&mut backend).unwrap();

        let commands = backend.replayed();
        assert_eq!(
            commands[0],
            DrawCommand::BindMaterial {
                ambient: [0.2; 4],
                diffuse: [0.8; 4],
            }
        );
        assert_eq!(commands[1], DrawCommand::Begin(PrimitiveTopology::Triangles));
        // 3 triangle points, End, Begin quads, 4 points, End, Begin polygon, 5 points, End
        assert_eq!(commands.len(), 1 + 1 + 3 + 1 + 1 + 4 + 1 + 1 + 5 + 1);
        assert_eq!(
            commands[2],
            DrawCommand::Point {
                normal: [0.0, 0.0, 1.0],
                position: [0.0, 0.0, 0.0],
            }
        );
    }

    #[test]
    fn test_sentinel_group_binds_no_material() {
        let mut mesh = Mesh::new();
        mesh.push_vertex(Vec3::zeros());
        mesh.push_vertex(Vec3::x());
        mesh.push_vertex(Vec3::y());
        mesh.push_normal(Vec3::z());
        let face: Vec<FacePoint> = (0..3).map(|i| FacePoint { vertex: i, normal: 0 }).collect();
        mesh.push_polygon(None, face);

        let mut backend = RecordingBackend::new(4);
        let model = CompiledModel::compile(&mesh, &mut backend).unwrap();
        backend.make_current();
        model.draw(&mut backend).unwrap();

        assert!(!backend
            .replayed()
            .iter()
            .any(|c| matches!(c, DrawCommand::BindMaterial { .. })));
    }

    #[test]
    fn test_draw_is_repeatable_and_stable() {
        let mesh = sample_mesh();
        let mut backend = RecordingBackend::new(4);
        let model = CompiledModel::compile(&mesh, &mut backend).unwrap();

        backend.make_current();
        model.draw(&mut backend).unwrap();
        let first: Vec<_> = backend.replayed().to_vec();
        backend.clear_replayed();
        model.draw(&mut backend).unwrap();

        assert_eq!(first, backend.replayed());
    }

    #[test]
    fn test_draw_before_context_fails() {
        let mesh = sample_mesh();
        let mut backend = RecordingBackend::new(4);
        let model = CompiledModel::compile(&mesh, &mut backend).unwrap();

        let result = model.draw(&mut backend);
        assert!(matches!(result, Err(RenderError::InvalidState(_))));
    }

    #[test]
    fn test_draw_after_release_fails() {
        let mesh = sample_mesh();
        let mut backend = RecordingBackend::new(4);
        let mut model = CompiledModel::compile(&mesh, &mut backend).unwrap();
        backend.make_current();

        model.release(&mut backend).unwrap();
        assert_eq!(backend.cached_lists(), 0);
        assert!(matches!(
            model.draw(&mut backend),
            Err(RenderError::InvalidState(_))
        ));
        // The slot is gone as well; releasing twice is an error
        assert!(matches!(
            model.release(&mut backend),
            Err(RenderError::InvalidState(_))
        ));
    }

    #[test]
    fn test_exhausted_backend_fails_compile() {
        let mesh = sample_mesh();
        let mut backend = RecordingBackend::new(0);
        let result = CompiledModel::compile(&mesh, &mut backend);
        assert!(matches!(result, Err(RenderError::ResourceExhausted(_))));
    }
}
