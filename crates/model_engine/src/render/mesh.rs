//! Material-grouped polygon geometry
//!
//! A [`Mesh`] is the in-memory result of parsing a model document: shared
//! vertex and normal tables plus polygons grouped first by material, then
//! by arity (triangles, quads, general polygons). It is pure data; the
//! rendering side consumes it once via
//! [`CompiledModel::compile`](crate::render::CompiledModel::compile).

use crate::foundation::math::Vec3;
use crate::render::Material;

/// One corner of a polygon: indices into the mesh's vertex and normal tables
///
/// Indices are stored 0-based and are validated during parsing, so lookups
/// through an assembled mesh cannot dangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacePoint {
    /// Index into the vertex table
    pub vertex: u32,
    /// Index into the normal table
    pub normal: u32,
}

/// An ordered list of face points; order defines winding
pub type Polygon = Vec<FacePoint>;

/// Polygons of one material, bucketed by arity in file-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonBatch {
    /// Polygons with exactly 3 points
    pub triangles: Vec<Polygon>,
    /// Polygons with exactly 4 points
    pub quads: Vec<Polygon>,
    /// Polygons with 5 or more points
    pub polygons: Vec<Polygon>,
}

impl PolygonBatch {
    /// Append a polygon to the bucket matching its arity
    ///
    /// Polygons with fewer than 3 points are rejected by the parser before
    /// they reach a batch.
    pub fn push(&mut self, polygon: Polygon) {
        match polygon.len() {
            3 => self.triangles.push(polygon),
            4 => self.quads.push(polygon),
            _ => self.polygons.push(polygon),
        }
    }

    /// Total number of polygons across all three buckets
    pub fn len(&self) -> usize {
        self.triangles.len() + self.quads.len() + self.polygons.len()
    }

    /// True when no polygon has been accumulated yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All polygons sharing one material selection
///
/// `name`/`material` are `None` for the sentinel group holding faces that
/// precede any material selection in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGroup {
    /// Material name as selected in the document, `None` before any selection
    pub name: Option<String>,
    /// Material captured at selection time; later registry redefinitions do
    /// not reach back into an assembled mesh
    pub material: Option<Material>,
    /// The group's polygons, bucketed by arity
    pub batch: PolygonBatch,
}

/// Parsed model geometry: vertex/normal tables and material-grouped polygons
///
/// Groups are kept in first-use order so batching is deterministic. The
/// tables are shared by every polygon through [`FacePoint`] indices, which
/// is what lets procedural variants rescale the whole model by rewriting
/// the vertex table alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    groups: Vec<MaterialGroup>,
}

impl Mesh {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        groups: Vec<MaterialGroup>,
    ) -> Self {
        Self {
            vertices,
            normals,
            groups,
        }
    }

    /// The vertex table, in definition order
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// The normal table, in definition order
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Material groups in first-use order
    pub fn groups(&self) -> &[MaterialGroup] {
        &self.groups
    }

    /// Total number of polygons across all groups
    pub fn polygon_count(&self) -> usize {
        self.groups.iter().map(|g| g.batch.len()).sum()
    }

    pub(crate) fn push_vertex(&mut self, vertex: Vec3) {
        self.vertices.push(vertex);
    }

    pub(crate) fn push_normal(&mut self, normal: Vec3) {
        self.normals.push(normal);
    }

    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn normal_count(&self) -> usize {
        self.normals.len()
    }

    /// Append a polygon under the given material selection
    ///
    /// The group for the selection is created with an empty batch on first
    /// use; subsequent polygons for the same selection land in the same
    /// group regardless of what was selected in between.
    pub(crate) fn push_polygon(
        &mut self,
        selection: Option<(&str, &Material)>,
        polygon: Polygon,
    ) {
        let name = selection.map(|(name, _)| name);
        let index = match self
            .groups
            .iter()
            .position(|g| g.name.as_deref() == name)
        {
            Some(index) => index,
            None => {
                self.groups.push(MaterialGroup {
                    name: name.map(str::to_owned),
                    material: selection.map(|(_, material)| material.clone()),
                    batch: PolygonBatch::default(),
                });
                self.groups.len() - 1
            }
        };
        self.groups[index].batch.push(polygon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: u32) -> Polygon {
        (0..n).map(|i| FacePoint { vertex: i, normal: i }).collect()
    }

    #[test]
    fn test_batch_classifies_by_arity() {
        let mut batch = PolygonBatch::default();
        batch.push(points(3));
        batch.push(points(4));
        batch.push(points(5));
        batch.push(points(7));

        assert_eq!(batch.triangles.len(), 1);
        assert_eq!(batch.quads.len(), 1);
        assert_eq!(batch.polygons.len(), 2);
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_groups_keep_first_use_order() {
        let red = Material::default();
        let mut mesh = Mesh::new();
        mesh.push_polygon(None, points(3));
        mesh.push_polygon(Some(("hull", &red)), points(3));
        mesh.push_polygon(Some(("glass", &red)), points(4));
        // Back to an earlier selection: no new group
        mesh.push_polygon(Some(("hull", &red)), points(5));

        let names: Vec<_> = mesh.groups().iter().map(|g| g.name.as_deref()).collect();
        assert_eq!(names, vec![None, Some("hull"), Some("glass")]);
        assert_eq!(mesh.groups()[1].batch.triangles.len(), 1);
        assert_eq!(mesh.groups()[1].batch.polygons.len(), 1);
    }

    #[test]
    fn test_sentinel_group_holds_unselected_faces() {
        let mut mesh = Mesh::new();
        mesh.push_polygon(None, points(3));
        mesh.push_polygon(None, points(3));

        assert_eq!(mesh.groups().len(), 1);
        assert!(mesh.groups()[0].name.is_none());
        assert!(mesh.groups()[0].material.is_none());
        assert_eq!(mesh.groups()[0].batch.triangles.len(), 2);
    }
}
