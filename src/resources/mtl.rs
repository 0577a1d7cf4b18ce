//! Parser for the material library side file referenced by `mtllib`.
//!
//! Same tokenizer as the OBJ parser. Texture maps are only recorded for
//! `.png` paths; anything else is skipped with a warning and the material
//! renders with the null texture instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MtlError {
    #[error("line {line}: `{directive}` needs {expected} components")]
    MissingComponents {
        line: usize,
        directive: &'static str,
        expected: usize,
    },
    #[error("line {line}: malformed number `{token}`")]
    MalformedNumber { line: usize, token: String },
    #[error("line {line}: `{directive}` before any `newmtl`")]
    DirectiveOutsideMaterial { line: usize, directive: String },
}

/// Reflectance and map paths for one `newmtl` record.
///
/// Defaults follow the format's convention: dim ambient, strong diffuse,
/// full specular, no maps.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDef {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub ambient_map: Option<String>,
    pub diffuse_map: Option<String>,
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            ambient: [0.2; 3],
            diffuse: [0.8; 3],
            specular: [1.0; 3],
            ambient_map: None,
            diffuse_map: None,
        }
    }
}

/// Parsed material library, keyed by material name in declaration order.
#[derive(Debug, Default, Clone)]
pub struct MtlData {
    pub materials: Vec<(String, MaterialDef)>,
}

impl MtlData {
    pub fn parse(src: &str) -> Result<Self, MtlError> {
        let mut data = MtlData::default();

        for (index, line) in src.lines().enumerate() {
            let line_no = index + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            let Some(&directive) = words.first() else {
                continue;
            };

            match directive {
                "newmtl" => {
                    let name = words[1..].concat();
                    data.materials.push((name, MaterialDef::default()));
                }
                "Ka" => {
                    current(&mut data, line_no, directive)?.ambient =
                        parse_floats(&words[1..], line_no, "Ka")?;
                }
                "Kd" => {
                    current(&mut data, line_no, directive)?.diffuse =
                        parse_floats(&words[1..], line_no, "Kd")?;
                }
                "Ks" => {
                    current(&mut data, line_no, directive)?.specular =
                        parse_floats(&words[1..], line_no, "Ks")?;
                }
                "map_Ka" => {
                    if let Some(path) = map_path(&words, line_no) {
                        current(&mut data, line_no, directive)?.ambient_map = Some(path);
                    }
                }
                "map_Kd" => {
                    if let Some(path) = map_path(&words, line_no) {
                        current(&mut data, line_no, directive)?.diffuse_map = Some(path);
                    }
                }
                _ => (),
            }
        }
        Ok(data)
    }

    pub fn get(&self, name: &str) -> Option<&MaterialDef> {
        self.materials
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }
}

fn current<'a>(
    data: &'a mut MtlData,
    line: usize,
    directive: &str,
) -> Result<&'a mut MaterialDef, MtlError> {
    data.materials
        .last_mut()
        .map(|(_, def)| def)
        .ok_or_else(|| MtlError::DirectiveOutsideMaterial {
            line,
            directive: directive.to_string(),
        })
}

/// Only png maps are honored; everything else falls back to the null texture.
fn map_path(words: &[&str], line: usize) -> Option<String> {
    let path = words.get(1)?;
    if !path.ends_with(".png") {
        log::warn!(
            "line {}: texture map {} is not a png and will be skipped",
            line,
            path
        );
        return None;
    }
    Some(path.to_string())
}

fn parse_floats(
    words: &[&str],
    line: usize,
    directive: &'static str,
) -> Result<[f32; 3], MtlError> {
    if words.len() < 3 {
        return Err(MtlError::MissingComponents {
            line,
            directive,
            expected: 3,
        });
    }
    let mut out = [0.0; 3];
    for (slot, token) in out.iter_mut().zip(words) {
        *slot = token.parse().map_err(|_| MtlError::MalformedNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}
