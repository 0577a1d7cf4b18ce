//! Render pipeline definitions.
//!
//! - `scene` builds the pipeline the draw queues render through
//! - `light` owns the point light uniform consumed by the scene shader
//! - `text` draws the bitmap-font overlay on top of the scene

pub mod light;
pub mod scene;
pub mod text;
