//! Engine data structures: models, textures and transforms.
//!
//! This module contains the core data types for scene representation:
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `transform` holds placement data for queued draw requests

pub mod model;
pub mod texture;
pub mod transform;
