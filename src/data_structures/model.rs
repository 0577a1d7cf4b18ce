//! Mesh, material and model definitions plus their GPU resources.
//!
//! A [`Model`] maps mesh names to GPU-resident [`Mesh`]es and material names
//! to [`Material`]s. A [`UnitModel`] is the multi-file variant: one flat
//! vertex buffer with no per-mesh naming, used for units whose parts were
//! merged into a single index space at load time.

use std::collections::HashMap;

use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::{Texture, create_default_sampler},
    resources::mtl::MaterialDef,
};

/// Anything that can describe its vertex buffer layout to a pipeline.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// One expanded vertex: position, normal and texture coordinate.
///
/// Produced by dereferencing face index triples at load time; never mutated
/// afterwards.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A named group of triangles sharing one GPU vertex buffer.
///
/// `offset` is the centering translation recorded at load time: the mesh was
/// moved so its bounding box midpoint sits at the origin, and the offset is
/// re-applied as a translation when the mesh is placed in the world.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub material: Option<String>,
    pub offset: Vector3<f32>,
}

/// Reflectance uniform data. Uniforms require 16 byte spacing, hence the
/// padding after every vec3.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 3],
    pub _padding: f32,
    pub diffuse: [f32; 3],
    pub _padding2: f32,
    pub specular: [f32; 3],
    pub _padding3: f32,
}

/// A named material: reflectance colors plus the ambient/diffuse map bind
/// group. Missing maps are substituted with the shared null texture when the
/// bind group is built, so rendering never has to branch on map presence.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        def: &MaterialDef,
        ambient_map: &Texture,
        diffuse_map: &Texture,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let uniform = MaterialUniform {
            ambient: def.ambient,
            _padding: 0.0,
            diffuse: def.diffuse,
            _padding2: 0.0,
            specular: def.specular,
            _padding3: 0.0,
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} material buffer", name)),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let ambient_sampler = ambient_map
            .sampler
            .clone()
            .unwrap_or_else(|| create_default_sampler(device));
        let diffuse_sampler = diffuse_map
            .sampler
            .clone()
            .unwrap_or_else(|| create_default_sampler(device));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&ambient_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&ambient_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&diffuse_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&diffuse_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: buffer.as_entire_binding(),
                },
            ],
            label: Some(&format!("{} material bind group", name)),
        });

        Self {
            name: name.to_string(),
            ambient: def.ambient,
            diffuse: def.diffuse,
            specular: def.specular,
            buffer,
            bind_group,
        }
    }
}

/// A loaded model: named meshes plus the materials they reference.
///
/// Invariant (checked at load): every mesh's material name resolves in
/// `materials`. The default material exists for meshes that never saw a
/// `usemtl` and as the render-time fallback.
#[derive(Debug)]
pub struct Model {
    pub meshes: HashMap<String, Mesh>,
    pub materials: HashMap<String, Material>,
    pub default_material: Material,
}

impl Model {
    /// Material to render a mesh with. Resolution failures were rejected at
    /// load time; should a stale name still slip through, the mesh renders
    /// with the default material and its null texture.
    pub fn material_for(&self, mesh: &Mesh) -> &Material {
        mesh.material
            .as_deref()
            .and_then(|name| self.materials.get(name))
            .unwrap_or(&self.default_material)
    }
}

/// The multi-file unit variant: all source files merged into one flat,
/// unnamed vertex buffer.
#[derive(Debug)]
pub struct UnitModel {
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
}
