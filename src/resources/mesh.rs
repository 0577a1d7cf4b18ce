//! Face expansion, mesh centering and vertex buffer upload.

use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::model,
    resources::obj::{Face, ObjData, ObjError},
};

/// Expand face index triples into flat vertex records by dereferencing the
/// global position/normal/texcoord lists.
///
/// Every index is range-checked; an out-of-range reference fails the load
/// instead of producing silently wrong geometry.
pub fn build_vertices(
    data: &ObjData,
    faces: &[Face],
) -> Result<Vec<model::ModelVertex>, ObjError> {
    let mut vertices = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        for corner in face {
            let position = *data.positions.get(corner.position).ok_or({
                ObjError::IndexOutOfRange {
                    kind: "position",
                    index: corner.position,
                    len: data.positions.len(),
                }
            })?;
            let normal = *data.normals.get(corner.normal).ok_or({
                ObjError::IndexOutOfRange {
                    kind: "normal",
                    index: corner.normal,
                    len: data.normals.len(),
                }
            })?;
            let tex_coords = *data.texcoords.get(corner.texcoord).ok_or({
                ObjError::IndexOutOfRange {
                    kind: "texcoord",
                    index: corner.texcoord,
                    len: data.texcoords.len(),
                }
            })?;
            vertices.push(model::ModelVertex {
                position,
                normal,
                tex_coords,
            });
        }
    }
    Ok(vertices)
}

/// Center vertex positions around the origin and return the translation that
/// undoes it.
///
/// The returned vector is the midpoint of the axis-aligned bounding box
/// before centering; it becomes [`model::Mesh::offset`] so world placement
/// can re-apply it. Decouples mesh-local pivoting from world transforms.
pub fn center_vertices(vertices: &mut [model::ModelVertex]) -> Vector3<f32> {
    let Some(first) = vertices.first() else {
        return Vector3::new(0.0, 0.0, 0.0);
    };
    let mut min = first.position;
    let mut max = first.position;
    for vertex in vertices.iter() {
        for i in 0..3 {
            min[i] = min[i].min(vertex.position[i]);
            max[i] = max[i].max(vertex.position[i]);
        }
    }
    let center = [
        min[0] + (max[0] - min[0]) / 2.0,
        min[1] + (max[1] - min[1]) / 2.0,
        min[2] + (max[2] - min[2]) / 2.0,
    ];
    for vertex in vertices.iter_mut() {
        for i in 0..3 {
            vertex.position[i] -= center[i];
        }
    }
    Vector3::from(center)
}

/// Upload expanded vertices into an immutable GPU vertex buffer.
pub fn upload_mesh(
    device: &wgpu::Device,
    label: &str,
    name: String,
    vertices: &[model::ModelVertex],
    material: Option<String>,
    offset: Vector3<f32>,
) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", label)),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    model::Mesh {
        name,
        vertex_buffer,
        num_vertices: vertices.len() as u32,
        material,
        offset,
    }
}
