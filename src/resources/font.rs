//! Bitmap font loading and glyph layout.
//!
//! A font is a png atlas of fixed-size glyph cells in one row, covering a
//! contiguous character range, plus a small line-oriented descriptor file
//! naming the atlas and the cell size. Same tokenizer as the model loaders;
//! the pure parse and layout layers are separate from the GPU upload.

use std::path::Path;

use thiserror::Error;

use crate::{
    data_structures::{model::Vertex, texture::Texture},
    resources::{self, LoadError},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("line {line}: `{directive}` needs {expected} components")]
    MissingComponents {
        line: usize,
        directive: &'static str,
        expected: usize,
    },
    #[error("line {line}: malformed number `{token}`")]
    MalformedNumber { line: usize, token: String },
    #[error("font descriptor is missing the `{directive}` directive")]
    MissingDirective { directive: &'static str },
    #[error("line {line}: atlas `{path}` is not a png")]
    AtlasNotPng { line: usize, path: String },
}

/// Parsed font descriptor: atlas path, glyph cell size and character range.
///
/// The range defaults to printable ASCII (first char 32, 96 glyphs), matching
/// the atlas layout the renderer expects: `glyph_count` cells of
/// `glyph_width` x `glyph_height` pixels in one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDef {
    pub atlas: String,
    pub glyph_width: u32,
    pub glyph_height: u32,
    pub first_char: u32,
    pub glyph_count: u32,
}

impl FontDef {
    pub fn parse(src: &str) -> Result<Self, FontError> {
        let mut atlas = None;
        let mut glyph = None;
        let mut first_char = 32;
        let mut glyph_count = 96;

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
                "atlas" => {
                    let path = words[1..].concat();
                    if !path.ends_with(".png") {
                        return Err(FontError::AtlasNotPng {
                            line: line_no,
                            path,
                        });
                    }
                    atlas = Some(path);
                }
                "glyph" => {
                    let [w, h] = parse_numbers::<2>(&words[1..], line_no, "glyph")?;
                    glyph = Some((w, h));
                }
                "range" => {
                    let [first, count] = parse_numbers::<2>(&words[1..], line_no, "range")?;
                    first_char = first;
                    glyph_count = count;
                }
                _ => (),
            }
        }

        let atlas = atlas.ok_or(FontError::MissingDirective { directive: "atlas" })?;
        let (glyph_width, glyph_height) =
            glyph.ok_or(FontError::MissingDirective { directive: "glyph" })?;
        Ok(Self {
            atlas,
            glyph_width,
            glyph_height,
            first_char,
            glyph_count,
        })
    }
}

/// Everything glyph layout needs, decoupled from the GPU texture so layout
/// is testable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub glyph_width: u32,
    pub glyph_height: u32,
    pub first_char: u32,
    pub glyph_count: u32,
    pub atlas_size: [u32; 2],
}

/// One corner of a glyph quad: screen position in pixels plus atlas uv.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex for GlyphVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Lay a string out as glyph quads starting at pixel position (x, y).
///
/// Monospace: the pen advances one cell width per character. Characters
/// outside the font's range produce no quad but still advance the pen, so
/// text width stays predictable.
pub fn build_glyph_vertices(
    metrics: &FontMetrics,
    text: &str,
    x: f32,
    y: f32,
) -> Vec<GlyphVertex> {
    let cell_w = metrics.glyph_width as f32;
    let cell_h = metrics.glyph_height as f32;
    let atlas_w = metrics.atlas_size[0] as f32;
    let atlas_h = metrics.atlas_size[1] as f32;

    let mut vertices = Vec::with_capacity(text.len() * 6);
    let mut pen = x;
    for c in text.chars() {
        let code = c as u32;
        if code >= metrics.first_char && code < metrics.first_char + metrics.glyph_count {
            let index = (code - metrics.first_char) as f32;
            let u0 = index * cell_w / atlas_w;
            let u1 = u0 + cell_w / atlas_w;
            let v1 = cell_h / atlas_h;
            let corner = |px: f32, py: f32, u: f32, v: f32| GlyphVertex {
                position: [px, py],
                uv: [u, v],
            };
            let (x0, x1) = (pen, pen + cell_w);
            let (y0, y1) = (y, y + cell_h);
            vertices.extend_from_slice(&[
                corner(x0, y0, u0, 0.0),
                corner(x1, y0, u1, 0.0),
                corner(x0, y1, u0, v1),
                corner(x0, y1, u0, v1),
                corner(x1, y0, u1, 0.0),
                corner(x1, y1, u1, v1),
            ]);
        }
        pen += cell_w;
    }
    vertices
}

/// A loaded bitmap font: the atlas texture plus its layout metrics.
pub struct Font {
    pub texture: Texture,
    pub metrics: FontMetrics,
}

/// Load a font from its descriptor file.
///
/// The atlas resolves relative to the descriptor's directory. Unlike material
/// maps the atlas has no fallback: a font without its atlas is useless, so
/// an unreadable or undecodable atlas fails the load.
pub fn load_font(
    path: impl AsRef<Path>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Result<Font, LoadError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::AssetNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let def = FontDef::parse(&src)?;

    let folder = path.parent().unwrap_or(Path::new("."));
    let atlas_path = folder.join(&def.atlas);
    let texture = resources::texture::load_texture(&atlas_path, device, queue).map_err(
        |source| LoadError::FontAtlasUnusable {
            path: atlas_path.clone(),
            source,
        },
    )?;

    let metrics = FontMetrics {
        glyph_width: def.glyph_width,
        glyph_height: def.glyph_height,
        first_char: def.first_char,
        glyph_count: def.glyph_count,
        atlas_size: [texture.texture.width(), texture.texture.height()],
    };
    Ok(Font { texture, metrics })
}

fn parse_numbers<const N: usize>(
    words: &[&str],
    line: usize,
    directive: &'static str,
) -> Result<[u32; N], FontError> {
    if words.len() < N {
        return Err(FontError::MissingComponents {
            line,
            directive,
            expected: N,
        });
    }
    let mut out = [0; N];
    for (slot, token) in out.iter_mut().zip(words) {
        *slot = token.parse().map_err(|_| FontError::MalformedNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}
