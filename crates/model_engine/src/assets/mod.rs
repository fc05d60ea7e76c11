//! Asset management system

pub mod materials;
pub mod obj_loader;

pub use materials::{MtlError, MtlParser};
pub use obj_loader::{IndexSpace, ObjError, ObjLoader};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::Mesh;

/// Asset loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Search paths tried in order before falling back to the path as given
    pub search_paths: Vec<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from("assets")],
        }
    }
}

/// Front-end for loading model assets through configured search paths
///
/// Game code hands this a relative asset name; the first search path
/// containing the file wins, and material libraries referenced by the
/// model resolve next to it.
pub struct ModelAssets {
    config: AssetConfig,
}

impl ModelAssets {
    /// Create an asset front-end with the given configuration
    pub fn new(config: AssetConfig) -> Self {
        Self { config }
    }

    /// Load a mesh, resolving the path against the configured search paths
    ///
    /// # Errors
    /// Any [`ObjError`] from reading or parsing the document.
    pub fn load_mesh<P: AsRef<Path>>(&self, path: P) -> Result<Mesh, ObjError> {
        let path = path.as_ref();
        let resolved = self.resolve(path);
        log::debug!("Loading mesh {} as {}", path.display(), resolved.display());
        ObjLoader::load_obj(resolved)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        for search_path in &self.config.search_paths {
            let candidate = search_path.join(path);
            if candidate.exists() {
                return candidate;
            }
        }
        path.to_path_buf()
    }
}
