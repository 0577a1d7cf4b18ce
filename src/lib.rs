//! rally-ngin
//!
//! An early-stage 3D engine built around two ideas: a hand-rolled OBJ/MTL
//! loader that turns art assets into GPU-ready meshes with materials, and a
//! draw-queue batcher that groups each frame's draws by resource identity so
//! every model/variant pair is bound exactly once per frame. The runtime
//! surface is intentionally small: implement [`flow::GameFlow`], hand it to
//! [`flow::run`] and enqueue draws each frame.
//!
//! High-level modules
//! - `camera`: camera types, controller and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue/pipeline
//! - `data_structures`: engine data models (meshes, materials, transforms, textures)
//! - `flow`: high level flow control (game state / event loop)
//! - `pipelines`: the scene render pipeline and the point light resources
//! - `resources`: the OBJ/MTL loaders that build models and GPU resources
//! - `render`: draw-queue batching for efficient bind-state reuse
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
