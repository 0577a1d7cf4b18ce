//! All logic for loading models/materials/textures from external files.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use wgpu::util::DeviceExt;

use crate::data_structures::{
    model::{Material, Model, UnitModel},
    texture::Texture,
};

pub mod font;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod texture;

pub use texture::material_layout;

use mtl::MaterialDef;
use thiserror::Error;

/// Load failure taxonomy. Asset-not-found, malformed content and unresolved
/// material references each abort the whole load; only optional texture maps
/// degrade to the null texture instead of failing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to open model {path}")]
    AssetNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to open material lib {path}")]
    MaterialLibNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model parse failed: {0}")]
    Obj(#[from] obj::ObjError),
    #[error("material lib parse failed: {0}")]
    Mtl(#[from] mtl::MtlError),
    #[error("mesh `{mesh}` references unknown material `{material}`")]
    UnknownMaterial { mesh: String, material: String },
    #[error("font descriptor parse failed: {0}")]
    Font(#[from] font::FontError),
    #[error("unable to load font atlas {path}")]
    FontAtlasUnusable {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Load a single-file model with object grouping, centering and an optional
/// material library.
///
/// The material library and its texture maps resolve relative to the model
/// file's directory. An unopenable model or material library fails the whole
/// load; a map that fails to open or decode is logged and replaced by the
/// shared null texture. Every mesh's `usemtl` name must resolve, otherwise
/// the load fails with [`LoadError::UnknownMaterial`].
pub fn load_model(
    path: impl AsRef<Path>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    null_texture: &Texture,
) -> Result<Model, LoadError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::AssetNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let data = obj::ObjData::parse(&src)?;
    let folder = path.parent().unwrap_or(Path::new("."));

    let mut materials = HashMap::new();
    if let Some(mtllib) = &data.mtllib {
        let mtl_path = folder.join(mtllib);
        let mtl_src =
            std::fs::read_to_string(&mtl_path).map_err(|source| LoadError::MaterialLibNotFound {
                path: mtl_path.clone(),
                source,
            })?;
        let mtl_data = mtl::MtlData::parse(&mtl_src)?;
        for (name, def) in &mtl_data.materials {
            let ambient_map = def
                .ambient_map
                .as_ref()
                .and_then(|map| load_map(&folder.join(map), device, queue));
            let diffuse_map = def
                .diffuse_map
                .as_ref()
                .and_then(|map| load_map(&folder.join(map), device, queue));
            // no ambient map: try the diffuse map before the null texture,
            // so flat-lit models still show their color map
            let ambient = ambient_map
                .as_ref()
                .or(diffuse_map.as_ref())
                .unwrap_or(null_texture);
            let diffuse = diffuse_map.as_ref().unwrap_or(null_texture);
            materials.insert(
                name.clone(),
                Material::new(device, name, def, ambient, diffuse, layout),
            );
        }
    }
    let default_material = Material::new(
        device,
        "default",
        &MaterialDef::default(),
        null_texture,
        null_texture,
        layout,
    );

    let mut meshes = HashMap::new();
    for object in &data.objects {
        if let Some(material) = &object.material
            && !materials.contains_key(material)
        {
            return Err(LoadError::UnknownMaterial {
                mesh: object.name.clone(),
                material: material.clone(),
            });
        }
        let mut vertices = mesh::build_vertices(&data, &object.faces)?;
        let offset = mesh::center_vertices(&mut vertices);
        let loaded = mesh::upload_mesh(
            device,
            &path.to_string_lossy(),
            object.name.clone(),
            &vertices,
            object.material.clone(),
            offset,
        );
        meshes.insert(object.name.clone(), loaded);
    }

    Ok(Model {
        meshes,
        materials,
        default_material,
    })
}

/// Load a multi-file unit model into one flat vertex buffer.
///
/// Files are parsed in the given order into a single shared index space, so
/// face indices in later files may reference vertex data from earlier ones.
/// No grouping, no centering, no materials.
pub fn load_unit_model(
    paths: &[impl AsRef<Path>],
    device: &wgpu::Device,
) -> Result<UnitModel, LoadError> {
    let mut sources = Vec::with_capacity(paths.len());
    let mut label = String::new();
    for path in paths {
        let path = path.as_ref();
        sources.push(std::fs::read_to_string(path).map_err(|source| {
            LoadError::AssetNotFound {
                path: path.to_path_buf(),
                source,
            }
        })?);
        label = path.to_string_lossy().into_owned();
    }
    let data = obj::ObjData::parse_concat(&sources)?;

    let mut vertices = Vec::new();
    for object in &data.objects {
        vertices.extend(mesh::build_vertices(&data, &object.faces)?);
    }

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Unit Vertex Buffer", label)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    Ok(UnitModel {
        vertex_buffer,
        num_vertices: vertices.len() as u32,
    })
}

fn load_map(path: &Path, device: &wgpu::Device, queue: &wgpu::Queue) -> Option<Texture> {
    match texture::load_texture(path, device, queue) {
        Ok(loaded) => Some(loaded),
        Err(e) => {
            log::warn!(
                "Unable to load texture map {}: {}. Falling back to the null texture.",
                path.display(),
                e
            );
            None
        }
    }
}
