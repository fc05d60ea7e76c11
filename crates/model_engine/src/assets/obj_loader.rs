//! OBJ file loader for 3D models
//!
//! Parses Wavefront .obj geometry into a material-grouped [`Mesh`]. The
//! loader resolves `f` records against the vertex/normal tables populated
//! so far (indices are 1-based in the document), pulls material libraries
//! referenced by `mtllib` through a pluggable source, and groups polygons
//! under the material selected by the most recent `usemtl`.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::assets::materials::{MtlError, MtlParser};
use crate::foundation::math::Vec3;
use crate::render::mesh::{FacePoint, Polygon};
use crate::render::{Material, Mesh};

/// Which index table a face component referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    /// The vertex position table
    Vertex,
    /// The normal table
    Normal,
}

impl fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// Errors raised while loading OBJ geometry
#[derive(Error, Debug)]
pub enum ObjError {
    /// Reading the document or a referenced library from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record carried a token that does not parse as expected
    #[error("Line {line}: malformed value '{text}'")]
    Parse {
        /// 1-based line number within the document
        line: usize,
        /// The offending raw text
        text: String,
    },

    /// A face referenced an index with no entry defined yet
    ///
    /// Index 0 is reserved and invalid; indices are 1-based and may only
    /// point at entries earlier in the document.
    #[error("Line {line}: face references undefined {space} index {index}")]
    Reference {
        /// 1-based line number within the document
        line: usize,
        /// Which table the dangling index pointed into
        space: IndexSpace,
        /// The index as written
        index: i64,
    },

    /// `usemtl` selected a name absent from the material registry
    #[error("Line {line}: material '{name}' is not defined")]
    MaterialNotFound {
        /// 1-based line number within the document
        line: usize,
        /// The undefined material name
        name: String,
    },

    /// A face resolved to fewer than 3 points
    #[error("Line {line}: degenerate face with {count} point(s)")]
    DegenerateFace {
        /// 1-based line number within the document
        line: usize,
        /// Number of points the face resolved to
        count: usize,
    },

    /// A referenced material library failed to parse
    #[error("Material library: {0}")]
    Material(#[from] MtlError),
}

/// OBJ geometry parser
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return its material-grouped mesh
    ///
    /// `mtllib` records are resolved relative to the OBJ file's directory.
    ///
    /// # Errors
    /// Any [`ObjError`]; the whole load fails rather than returning a
    /// partial mesh.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut materials = HashMap::new();
        let mesh = Self::parse(&contents, &mut materials, |library| {
            fs::read_to_string(base_dir.join(library)).map_err(ObjError::Io)
        })?;

        log::info!(
            "Loaded model {}: {} vertices, {} normals, {} polygon(s) in {} group(s)",
            path.display(),
            mesh.vertices().len(),
            mesh.normals().len(),
            mesh.polygon_count(),
            mesh.groups().len()
        );
        Ok(mesh)
    }

    /// Parse OBJ document contents into a [`Mesh`]
    ///
    /// `materials` is the registry `usemtl` names are resolved against;
    /// `mtllib` records load each listed library through `load_library`
    /// and merge the parsed definitions into the registry, later
    /// definitions overwriting earlier ones. Pass a pre-populated registry
    /// and a failing source to parse documents with no library references.
    ///
    /// Blank lines, comments, and unrecognized record keywords are ignored.
    ///
    /// # Errors
    /// Any [`ObjError`]; the whole parse fails rather than returning a
    /// partial mesh.
    pub fn parse<S>(
        contents: &str,
        materials: &mut HashMap<String, Material>,
        mut load_library: S,
    ) -> Result<Mesh, ObjError>
    where
        S: FnMut(&str) -> Result<String, ObjError>,
    {
        let mut mesh = Mesh::new();
        let mut current: Option<(String, Material)> = None;

        for (line_idx, raw_line) in contents.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let command = match tokens.next() {
                Some(cmd) => cmd,
                None => continue,
            };

            match command {
                "v" => {
                    mesh.push_vertex(Self::parse_vec3(tokens, line_num, line)?);
                }

                "vn" => {
                    mesh.push_normal(Self::parse_vec3(tokens, line_num, line)?);
                }

                "mtllib" => {
                    for library in tokens {
                        let library_text = load_library(library)?;
                        let parsed = MtlParser::parse(&library_text)?;
                        log::debug!(
                            "Merged {} material(s) from library {}",
                            parsed.len(),
                            library
                        );
                        materials.extend(parsed);
                    }
                }

                "usemtl" => {
                    let name = tokens.next().ok_or_else(|| ObjError::Parse {
                        line: line_num,
                        text: line.to_string(),
                    })?;
                    let material =
                        materials
                            .get(name)
                            .ok_or_else(|| ObjError::MaterialNotFound {
                                line: line_num,
                                name: name.to_string(),
                            })?;
                    current = Some((name.to_string(), material.clone()));
                }

                "f" => {
                    let mut polygon: Polygon = Vec::new();
                    for component in tokens {
                        polygon.push(Self::parse_face_point(component, &mesh, line_num)?);
                    }
                    if polygon.len() < 3 {
                        return Err(ObjError::DegenerateFace {
                            line: line_num,
                            count: polygon.len(),
                        });
                    }
                    let selection = current.as_ref().map(|(name, mat)| (name.as_str(), mat));
                    mesh.push_polygon(selection, polygon);
                }

                // Ignore other commands
                _ => {}
            }
        }

        log::debug!(
            "Parsed OBJ document: {} vertices, {} normals, {} polygon(s)",
            mesh.vertices().len(),
            mesh.normals().len(),
            mesh.polygon_count()
        );
        Ok(mesh)
    }

    /// Parse exactly three float components into a [`Vec3`]
    fn parse_vec3<'a, I>(tokens: I, line: usize, raw: &str) -> Result<Vec3, ObjError>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut components = [0.0f32; 3];
        let mut count = 0;
        for token in tokens {
            if count == 3 {
                return Err(ObjError::Parse {
                    line,
                    text: raw.to_string(),
                });
            }
            components[count] = token.parse().map_err(|_| ObjError::Parse {
                line,
                text: token.to_string(),
            })?;
            count += 1;
        }
        if count != 3 {
            return Err(ObjError::Parse {
                line,
                text: raw.to_string(),
            });
        }
        Ok(Vec3::new(components[0], components[1], components[2]))
    }

    /// Resolve one `vertex/texture/normal` face component
    ///
    /// The texture field is carried by the format but not interpreted
    /// here, so it is not validated beyond being present.
    fn parse_face_point(
        component: &str,
        mesh: &Mesh,
        line: usize,
    ) -> Result<FacePoint, ObjError> {
        let mut fields = component.split('/');
        let (vertex, normal) = match (fields.next(), fields.next(), fields.next(), fields.next())
        {
            (Some(vertex), Some(_texture), Some(normal), None) => (vertex, normal),
            _ => {
                return Err(ObjError::Parse {
                    line,
                    text: component.to_string(),
                })
            }
        };

        Ok(FacePoint {
            vertex: Self::resolve_index(vertex, mesh.vertex_count(), IndexSpace::Vertex, line)?,
            normal: Self::resolve_index(normal, mesh.normal_count(), IndexSpace::Normal, line)?,
        })
    }

    /// Check a 1-based document index against the table populated so far
    fn resolve_index(
        token: &str,
        defined: usize,
        space: IndexSpace,
        line: usize,
    ) -> Result<u32, ObjError> {
        let index = token.parse::<i64>().map_err(|_| ObjError::Parse {
            line,
            text: token.to_string(),
        })?;
        if index < 1 || index as usize > defined {
            return Err(ObjError::Reference { line, space, index });
        }
        Ok((index - 1) as u32)
    }
}
