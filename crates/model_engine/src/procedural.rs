//! Procedural model variants
//!
//! Derives new meshes from a parsed base mesh by rescaling its vertex
//! table, the trick behind fields of asteroids that all come from one
//! source model. The base mesh is never modified and can seed any number
//! of independent variants before (or after) being compiled itself.

use rand::Rng;

use crate::render::Mesh;

/// Lower bound of the uniform per-vertex scale range
pub const SCALE_MIN: f32 = 0.7;

/// Upper bound of the uniform per-vertex scale range
pub const SCALE_MAX: f32 = 1.3;

/// Source of per-vertex scale factors
///
/// Injectable so tests drive [`perturb`] with deterministic sequences;
/// production code uses [`UniformJitter`].
pub trait VertexJitter {
    /// The scale factor for the next vertex table entry
    fn next_scale(&mut self) -> f32;
}

/// Any closure yielding scale factors is a jitter source
impl<F: FnMut() -> f32> VertexJitter for F {
    fn next_scale(&mut self) -> f32 {
        self()
    }
}

/// Uniform jitter in `[SCALE_MIN, SCALE_MAX]` backed by a `rand` RNG
pub struct UniformJitter<R> {
    rng: R,
}

impl<R: Rng> UniformJitter<R> {
    /// Wrap an RNG as a uniform jitter source
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> VertexJitter for UniformJitter<R> {
    fn next_scale(&mut self) -> f32 {
        self.rng.gen_range(SCALE_MIN..=SCALE_MAX)
    }
}

/// Derive a new mesh by scaling every vertex table entry
///
/// Each entry is multiplied by one scalar from the jitter source, applied
/// to all three coordinates. Because faces index the shared vertex table,
/// every face corner referencing an entry moves with it; variation happens
/// per table entry, not per face corner. Normals and polygon groupings are
/// carried over unchanged.
pub fn perturb<J: VertexJitter + ?Sized>(base: &Mesh, jitter: &mut J) -> Mesh {
    let vertices = base
        .vertices()
        .iter()
        .map(|vertex| vertex * jitter.next_scale())
        .collect();
    Mesh::from_parts(vertices, base.normals().to_vec(), base.groups().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ObjError, ObjLoader};
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn no_libraries(_: &str) -> Result<String, ObjError> {
        panic!("test document references no material library")
    }

    fn base_mesh() -> Mesh {
        let obj = "v 1 2 3\nv 4 5 6\nv 7 8 9\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
        let mut materials = HashMap::new();
        ObjLoader::parse(obj, &mut materials, no_libraries).unwrap()
    }

    #[test]
    fn test_identity_jitter_reproduces_base() {
        let base = base_mesh();
        let mut identity = || 1.0f32;
        let variant = perturb(&base, &mut identity);

        assert_eq!(variant.vertices(), base.vertices());
        assert_eq!(variant.normals(), base.normals());
        assert_eq!(variant.groups(), base.groups());
    }

    #[test]
    fn test_each_vertex_gets_its_own_scale() {
        let base = base_mesh();
        let mut scales = [0.5f32, 1.0, 2.0].into_iter();
        let mut jitter = move || scales.next().unwrap();
        let variant = perturb(&base, &mut jitter);

        assert_relative_eq!(variant.vertices()[0].x, 0.5);
        assert_relative_eq!(variant.vertices()[0].z, 1.5);
        assert_relative_eq!(variant.vertices()[1].y, 5.0);
        assert_relative_eq!(variant.vertices()[2].x, 14.0);
        // Base mesh is untouched
        assert_relative_eq!(base.vertices()[0].x, 1.0);
    }

    #[test]
    fn test_uniform_jitter_stays_in_range() {
        use rand::SeedableRng;
        let mut jitter = UniformJitter::new(rand::rngs::StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let scale = jitter.next_scale();
            assert!((SCALE_MIN..=SCALE_MAX).contains(&scale));
        }
    }

    #[test]
    fn test_variants_are_independent() {
        let base = base_mesh();
        let mut grow = || 1.3f32;
        let mut shrink = || 0.7f32;
        let big = perturb(&base, &mut grow);
        let small = perturb(&base, &mut shrink);

        assert_relative_eq!(big.vertices()[0].x, 1.3);
        assert_relative_eq!(small.vertices()[0].x, 0.7);
        assert_relative_eq!(base.vertices()[0].x, 1.0);
    }
}
