//! Draw-queue batching.
//!
//! Scene code never issues draw calls directly. It enqueues a transform into
//! the queue of a registered (model, variant) slot, and at the end of the
//! frame [`DrawQueues::flush`] walks the slots in registration order, binds
//! each non-empty slot's resources exactly once and emits the queued draws in
//! FIFO order. Batching by resource identity instead of submission order is
//! what keeps redundant bind-state changes off the GPU.
//!
//! # Key types
//!
//! - [`DrawQueues<R>`] holds the per-slot FIFO queues
//! - [`DrawPass<R>`] is the surface the batcher drains into; tests use a
//!   recording implementation, rendering uses [`ScenePass`]
//! - [`UnitBatch`] / [`MeshBatch`] are the two slot resource kinds

use std::mem;

use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::data_structures::{
    model::{Material, Mesh, Model, UnitModel, Vertex},
    transform::ModelTransform,
};

/// Handle for a registered (model, variant) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId(usize);

struct Slot<R> {
    resources: R,
    queue: Vec<ModelTransform>,
}

/// Per-frame draw queues over a fixed enumeration of slots.
///
/// Slots are registered once at startup; `enqueue` appends to a slot's FIFO
/// queue and `flush` drains everything. After a flush all queues are empty
/// and the next frame can start enqueueing again.
pub struct DrawQueues<R> {
    slots: Vec<Slot<R>>,
}

impl<R> DrawQueues<R> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a (model, variant) slot. Registration order is the render
    /// order across queues.
    pub fn register(&mut self, resources: R) -> SlotId {
        self.slots.push(Slot {
            resources,
            queue: Vec::new(),
        });
        SlotId(self.slots.len() - 1)
    }

    pub fn resources(&self, slot: SlotId) -> &R {
        &self.slots[slot.0].resources
    }

    /// Append a draw request to a slot's queue. O(1); queue depth is bounded
    /// only by the number of visible instances this frame.
    pub fn enqueue(&mut self, slot: SlotId, transform: impl Into<ModelTransform>) {
        self.slots[slot.0].queue.push(transform.into());
    }

    /// True when no slot has pending draw requests.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.queue.is_empty())
    }

    /// Drain every queue into `pass`.
    ///
    /// For each slot in registration order: skip it entirely when its queue
    /// is empty, otherwise bind its resources once and draw every queued
    /// transform in enqueue order. All queues are empty afterwards, so a
    /// second flush with no intervening enqueues performs no binds and no
    /// draws.
    pub fn flush<P: DrawPass<R>>(&mut self, pass: &mut P) {
        for slot in &mut self.slots {
            if slot.queue.is_empty() {
                continue;
            }
            pass.bind(&slot.resources);
            for transform in slot.queue.drain(..) {
                pass.draw(&slot.resources, &transform);
            }
        }
    }
}

impl<R> Default for DrawQueues<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// The render collaborator surface the batcher drains into: bind a slot's
/// resources, then issue one draw per queued transform.
pub trait DrawPass<R> {
    fn bind(&mut self, resources: &R);
    fn draw(&mut self, resources: &R, transform: &ModelTransform);
}

/**
 * The raw instance is the world matrix as it is stored on the GPU, one entry
 * per queued draw.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

/**
 * Stride layout: the world matrix as four 4d column vectors. A mat4 takes up
 * four vertex slots, so each vec4 gets its own shader location.
 */
impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // advance per instance, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Slot resources for one (unit model, color variant) pair: the unit's flat
/// vertex buffer, the variant's texture bind group and a per-slot instance
/// buffer the flush writes world matrices into.
pub struct UnitBatch {
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub material: Material,
    pub instance_buffer: wgpu::Buffer,
    pub capacity: u32,
}

impl UnitBatch {
    pub fn new(device: &wgpu::Device, model: &UnitModel, material: Material, capacity: u32) -> Self {
        Self {
            // buffer handles are internally ref-counted, cloning shares the
            // GPU allocation with the owning model
            vertex_buffer: model.vertex_buffer.clone(),
            num_vertices: model.num_vertices,
            material,
            instance_buffer: mk_instance_buffer(device, capacity),
            capacity,
        }
    }
}

/// Slot resources for one named mesh of a material model. The mesh name and
/// centering offset travel with the slot so the flush can apply per-mesh sub
/// transforms.
pub struct MeshBatch {
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub bind_group: wgpu::BindGroup,
    pub mesh_name: String,
    pub offset: Vector3<f32>,
    pub instance_buffer: wgpu::Buffer,
    pub capacity: u32,
}

impl MeshBatch {
    pub fn new(device: &wgpu::Device, model: &Model, mesh: &Mesh, capacity: u32) -> Self {
        let material = model.material_for(mesh);
        Self {
            vertex_buffer: mesh.vertex_buffer.clone(),
            num_vertices: mesh.num_vertices,
            bind_group: material.bind_group.clone(),
            mesh_name: mesh.name.clone(),
            offset: mesh.offset,
            instance_buffer: mk_instance_buffer(device, capacity),
            capacity,
        }
    }

    /// One slot per mesh of the model, e.g. for terrain models whose parts
    /// all render whenever the model is enqueued.
    pub fn for_model(device: &wgpu::Device, model: &Model, capacity: u32) -> Vec<MeshBatch> {
        model
            .meshes
            .values()
            .map(|mesh| MeshBatch::new(device, model, mesh, capacity))
            .collect()
    }
}

fn mk_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
    let zeroed = vec![InstanceRaw { model: [[0.0; 4]; 4] }; capacity as usize];
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Instance Buffer"),
        contents: bytemuck::cast_slice(&zeroed),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// [`DrawPass`] implementation over an active wgpu render pass.
///
/// `bind` sets the slot's vertex buffer, instance buffer and texture bind
/// group once; every `draw` writes the next world matrix into the slot's
/// instance buffer and issues one draw selecting that instance.
pub struct ScenePass<'a, 'encoder> {
    pub queue: &'a wgpu::Queue,
    pub render_pass: &'a mut wgpu::RenderPass<'encoder>,
    instance_index: u32,
}

impl<'a, 'encoder> ScenePass<'a, 'encoder> {
    pub fn new(queue: &'a wgpu::Queue, render_pass: &'a mut wgpu::RenderPass<'encoder>) -> Self {
        Self {
            queue,
            render_pass,
            instance_index: 0,
        }
    }

    fn write_instance(&mut self, buffer: &wgpu::Buffer, capacity: u32, raw: InstanceRaw) -> bool {
        if self.instance_index >= capacity {
            log::warn!(
                "draw queue overflowed its instance buffer ({} entries), dropping the draw",
                capacity
            );
            return false;
        }
        self.queue.write_buffer(
            buffer,
            self.instance_index as wgpu::BufferAddress
                * mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            bytemuck::cast_slice(&[raw]),
        );
        true
    }
}

impl DrawPass<UnitBatch> for ScenePass<'_, '_> {
    fn bind(&mut self, resources: &UnitBatch) {
        self.instance_index = 0;
        self.render_pass
            .set_bind_group(0, &resources.material.bind_group, &[]);
        self.render_pass
            .set_vertex_buffer(0, resources.vertex_buffer.slice(..));
        self.render_pass
            .set_vertex_buffer(1, resources.instance_buffer.slice(..));
    }

    fn draw(&mut self, resources: &UnitBatch, transform: &ModelTransform) {
        let raw = InstanceRaw {
            model: transform.base.to_matrix().into(),
        };
        if self.write_instance(&resources.instance_buffer, resources.capacity, raw) {
            self.render_pass.draw(
                0..resources.num_vertices,
                self.instance_index..self.instance_index + 1,
            );
            self.instance_index += 1;
        }
    }
}

impl DrawPass<MeshBatch> for ScenePass<'_, '_> {
    fn bind(&mut self, resources: &MeshBatch) {
        self.instance_index = 0;
        self.render_pass.set_bind_group(0, &resources.bind_group, &[]);
        self.render_pass
            .set_vertex_buffer(0, resources.vertex_buffer.slice(..));
        self.render_pass
            .set_vertex_buffer(1, resources.instance_buffer.slice(..));
    }

    fn draw(&mut self, resources: &MeshBatch, transform: &ModelTransform) {
        let raw = InstanceRaw {
            model: transform
                .matrix_for(&resources.mesh_name, resources.offset)
                .into(),
        };
        if self.write_instance(&resources.instance_buffer, resources.capacity, raw) {
            self.render_pass.draw(
                0..resources.num_vertices,
                self.instance_index..self.instance_index + 1,
            );
            self.instance_index += 1;
        }
    }
}
