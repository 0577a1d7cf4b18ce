//! Line-oriented parser for the OBJ-like model text format.
//!
//! The parser only builds index data: positions, texture coordinates, normals
//! and per-object face references. Expanding faces into flat vertex data and
//! uploading to the GPU happens in [`crate::resources::mesh`].

use thiserror::Error;

/// Failures while reading OBJ text. Malformed content always fails the whole
/// load; there is no logged-and-continue path that could leave corrupt
/// geometry behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjError {
    #[error("line {line}: `{directive}` needs {expected} components")]
    MissingComponents {
        line: usize,
        directive: &'static str,
        expected: usize,
    },
    #[error("line {line}: malformed number `{token}`")]
    MalformedNumber { line: usize, token: String },
    #[error("line {line}: face has fewer than 3 vertex references")]
    DegenerateFace { line: usize },
    #[error("line {line}: vertex reference `{token}` is not of the form p/t/n")]
    MalformedFaceRef { line: usize, token: String },
    #[error("line {line}: index 0 is invalid, OBJ indices start at 1")]
    ZeroIndex { line: usize },
    #[error("face references {kind} index {index} but only {len} are defined")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },
}

/// One corner of a triangle: indices into the global position, texture
/// coordinate and normal lists. Already 0-based and, for multi-file loads,
/// already shifted by the per-file base offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: usize,
    pub normal: usize,
}

/// A triangle produced by fan-triangulating an `f` line.
pub type Face = [FaceVertex; 3];

/// A named face bucket. `o` lines switch buckets; faces before the first `o`
/// land in the default bucket with an empty name.
#[derive(Debug, Default, Clone)]
pub struct ObjObject {
    pub name: String,
    pub material: Option<String>,
    pub faces: Vec<Face>,
}

/// Parsed OBJ data with one shared index space across all parsed sources.
#[derive(Debug, Default, Clone)]
pub struct ObjData {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub objects: Vec<ObjObject>,
    pub mtllib: Option<String>,
}

impl ObjData {
    /// Parse a single OBJ source with `o`/`mtllib`/`usemtl` handling.
    pub fn parse(src: &str) -> Result<Self, ObjError> {
        let mut data = ObjData::default();
        data.parse_source(src, true)?;
        Ok(data)
    }

    /// Parse several OBJ sources into one shared index space.
    ///
    /// Before each source is read, the current lengths of the position,
    /// texture coordinate and normal lists become that file's base offsets
    /// and are added to every face index it contributes. The result is a
    /// single unnamed bucket holding all faces in file order; grouping and
    /// material directives are ignored in this variant.
    pub fn parse_concat<S: AsRef<str>>(sources: &[S]) -> Result<Self, ObjError> {
        let mut data = ObjData::default();
        for src in sources {
            data.parse_source(src.as_ref(), false)?;
        }
        Ok(data)
    }

    fn parse_source(&mut self, src: &str, grouping: bool) -> Result<(), ObjError> {
        let position_base = self.positions.len();
        let texcoord_base = self.texcoords.len();
        let normal_base = self.normals.len();

        let mut current = if grouping { None } else { Some(self.bucket("")) };

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
                "v" => {
                    let [x, y, z] = parse_floats::<3>(&words[1..], line_no, "v")?;
                    self.positions.push([x, y, z]);
                }
                "vt" => {
                    let [u, v] = parse_floats::<2>(&words[1..], line_no, "vt")?;
                    self.texcoords.push([u, v]);
                }
                "vn" => {
                    let [x, y, z] = parse_floats::<3>(&words[1..], line_no, "vn")?;
                    self.normals.push([x, y, z]);
                }
                "f" => {
                    let refs = &words[1..];
                    if refs.len() < 3 {
                        return Err(ObjError::DegenerateFace { line: line_no });
                    }
                    let mut corners = Vec::with_capacity(refs.len());
                    for token in refs {
                        let mut corner = parse_face_ref(token, line_no)?;
                        corner.position += position_base;
                        corner.texcoord += texcoord_base;
                        corner.normal += normal_base;
                        corners.push(corner);
                    }
                    let bucket = *current.get_or_insert_with(|| self.bucket(""));
                    // fan triangulation: an n-gon becomes n-2 triangles
                    // sharing the first referenced vertex
                    for i in 1..corners.len() - 1 {
                        self.objects[bucket]
                            .faces
                            .push([corners[0], corners[i], corners[i + 1]]);
                    }
                }
                "o" if grouping => {
                    // `o` with no name falls back to the default bucket, and
                    // the bucket exists even if no faces ever follow
                    let name = words.get(1).copied().unwrap_or("");
                    current = Some(self.bucket(name));
                }
                "mtllib" if grouping => {
                    self.mtllib = Some(words[1..].concat());
                }
                "usemtl" if grouping => {
                    let bucket = *current.get_or_insert_with(|| self.bucket(""));
                    self.objects[bucket].material = Some(words[1..].concat());
                }
                // unrecognized directives (s, g, vendor extensions) are skipped
                _ => (),
            }
        }
        Ok(())
    }

    fn bucket(&mut self, name: &str) -> usize {
        if let Some(index) = self.objects.iter().position(|o| o.name == name) {
            return index;
        }
        self.objects.push(ObjObject {
            name: name.to_string(),
            ..Default::default()
        });
        self.objects.len() - 1
    }
}

fn parse_floats<const N: usize>(
    words: &[&str],
    line: usize,
    directive: &'static str,
) -> Result<[f32; N], ObjError> {
    if words.len() < N {
        return Err(ObjError::MissingComponents {
            line,
            directive,
            expected: N,
        });
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(words) {
        *slot = token.parse().map_err(|_| ObjError::MalformedNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}

/// Parse a `p/t/n` reference, converting the 1-based OBJ indices to 0-based.
fn parse_face_ref(token: &str, line: usize) -> Result<FaceVertex, ObjError> {
    let mut parts = token.split('/');
    let mut next = || -> Result<usize, ObjError> {
        let part = parts.next().ok_or_else(|| ObjError::MalformedFaceRef {
            line,
            token: token.to_string(),
        })?;
        let index: usize = part.parse().map_err(|_| ObjError::MalformedFaceRef {
            line,
            token: token.to_string(),
        })?;
        if index == 0 {
            return Err(ObjError::ZeroIndex { line });
        }
        Ok(index - 1)
    };
    let position = next()?;
    let texcoord = next()?;
    let normal = next()?;
    Ok(FaceVertex {
        position,
        texcoord,
        normal,
    })
}
