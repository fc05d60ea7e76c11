//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl documents into [`Material`] color sets. Each
//! `newmtl` record opens a material that accumulates `Ka`/`Kd`/`Ks`/`Ke`
//! colors until the next `newmtl` or end of input finalizes it.

use std::collections::HashMap;

use thiserror::Error;

use crate::render::material::{Material, Rgba};

/// Errors raised while parsing a material library
#[derive(Error, Debug)]
pub enum MtlError {
    /// A record carried a token that does not parse as expected
    #[error("Line {line}: malformed value '{text}'")]
    Parse {
        /// 1-based line number within the document
        line: usize,
        /// The offending raw text
        text: String,
    },

    /// A color record carried an unsupported number of components
    ///
    /// Valid counts are 1 (replicated gray), 3 (RGB), and 4 (RGBA).
    #[error("Line {line}: color record with {count} component(s)")]
    MalformedColor {
        /// 1-based line number within the document
        line: usize,
        /// Number of components found
        count: usize,
    },
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL document contents into a map of material name -> [`Material`]
    ///
    /// A redefined name overwrites the earlier definition (last write wins).
    /// Color records seen before any `newmtl`, blank lines, comments, and
    /// unrecognized record keywords are ignored.
    ///
    /// # Errors
    /// [`MtlError::Parse`] for unparseable tokens,
    /// [`MtlError::MalformedColor`] for color records with a component
    /// count other than 1, 3, or 4.
    pub fn parse(contents: &str) -> Result<HashMap<String, Material>, MtlError> {
        let mut materials = HashMap::new();
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
                "newmtl" => {
                    // Finalize the material in progress before starting the next
                    if let Some((name, material)) = current.take() {
                        materials.insert(name, material);
                    }

                    let name = tokens.next().ok_or_else(|| MtlError::Parse {
                        line: line_num,
                        text: line.to_string(),
                    })?;
                    current = Some((name.to_string(), Material::default()));
                }

                "Ka" | "Kd" | "Ks" | "Ke" => {
                    if let Some((_, material)) = current.as_mut() {
                        let color = Self::parse_color(tokens, line_num)?;
                        match command {
                            "Ka" => material.ambient = color,
                            "Kd" => material.diffuse = color,
                            "Ks" => material.specular = color,
                            _ => material.emission = color,
                        }
                    }
                }

                // Ignore unknown commands silently
                _ => {}
            }
        }

        // Finalize the last material
        if let Some((name, material)) = current {
            materials.insert(name, material);
        }

        Ok(materials)
    }

    /// Expand a color record's components into an RGBA quadruple
    ///
    /// One component replicates into R, G, and B; one- and three-component
    /// forms get an alpha of 0.0 appended; four components are used as-is.
    fn parse_color<'a, I>(tokens: I, line: usize) -> Result<Rgba, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut values = Vec::with_capacity(4);
        for token in tokens {
            let value = token.parse::<f32>().map_err(|_| MtlError::Parse {
                line,
                text: token.to_string(),
            })?;
            values.push(value);
        }

        match values.as_slice() {
            &[c] => Ok([c, c, c, 0.0]),
            &[r, g, b] => Ok([r, g, b, 0.0]),
            &[r, g, b, a] => Ok([r, g, b, a]),
            _ => Err(MtlError::MalformedColor {
                line,
                count: values.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_material() {
        let mtl_content = r#"
# Ship hull
newmtl Hull
Ka 0.2 0.2 0.25
Kd 0.7 0.7 0.8
Ks 0.9 0.9 0.9
Ke 0.0 0.0 0.0
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 1);

        let mat = materials.get("Hull").unwrap();
        assert_eq!(mat.ambient, [0.2, 0.2, 0.25, 0.0]);
        assert_eq!(mat.diffuse, [0.7, 0.7, 0.8, 0.0]);
        assert_eq!(mat.specular, [0.9, 0.9, 0.9, 0.0]);
        assert_eq!(mat.emission, [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_component_replicates() {
        let materials = MtlParser::parse("newmtl Gray\nKa 0.5\n").unwrap();
        assert_eq!(materials.get("Gray").unwrap().ambient, [0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_four_components_used_as_is() {
        let materials = MtlParser::parse("newmtl Tinted\nKd 0.1 0.2 0.3 0.4\n").unwrap();
        assert_eq!(materials.get("Tinted").unwrap().diffuse, [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_parse_multiple_materials() {
        let mtl_content = r#"
newmtl Body
Kd 1.0 0.0 0.0

newmtl Cockpit
Kd 0.0 1.0 0.0
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials.get("Body").unwrap().diffuse, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(materials.get("Cockpit").unwrap().diffuse, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_redefinition_overwrites() {
        let mtl_content = r#"
newmtl Body
Kd 1.0 0.0 0.0
newmtl Body
Kd 0.0 0.0 1.0
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials.get("Body").unwrap().diffuse, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_bad_component_counts_are_rejected() {
        let two = MtlParser::parse("newmtl M\nKa 0.1 0.2\n");
        assert!(matches!(
            two,
            Err(MtlError::MalformedColor { line: 2, count: 2 })
        ));

        let five = MtlParser::parse("newmtl M\nKd 1 2 3 4 5\n");
        assert!(matches!(
            five,
            Err(MtlError::MalformedColor { line: 2, count: 5 })
        ));
    }

    #[test]
    fn test_bad_float_is_rejected_with_token() {
        let result = MtlParser::parse("newmtl M\nKd 0.1 oops 0.3\n");
        match result {
            Err(MtlError::Parse { line, text }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "oops");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_commands_and_leading_colors_are_ignored() {
        let mtl_content = r#"
Kd 1.0 1.0 1.0
newmtl M
Ns 250.0
illum 2
Kd 0.3 0.3 0.3
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials.get("M").unwrap().diffuse, [0.3, 0.3, 0.3, 0.0]);
    }

    #[test]
    fn test_missing_name_is_rejected() {
        assert!(matches!(
            MtlParser::parse("newmtl\n"),
            Err(MtlError::Parse { line: 1, .. })
        ));
    }
}
