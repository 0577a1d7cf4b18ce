//! Placement transforms for queued draw requests.
//!
//! A [`Transform`] is an origin plus a 4x4 basis. A [`ModelTransform`] adds
//! optional per-mesh sub-transforms for multi-part models (turrets, tracks)
//! on top of the shared base placement.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix, Vector3};

/// Origin plus basis matrix. The basis carries rotation and scale; the
/// origin is applied last so `to_matrix` is translate(origin) * basis.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub origin: Vector3<f32>,
    pub basis: Matrix4<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            origin: Vector3::new(0.0, 0.0, 0.0),
            basis: Matrix4::identity(),
        }
    }

    pub fn xbasis(&self) -> Vector3<f32> {
        self.basis.x.truncate()
    }

    pub fn ybasis(&self) -> Vector3<f32> {
        self.basis.y.truncate()
    }

    pub fn zbasis(&self) -> Vector3<f32> {
        self.basis.z.truncate()
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.origin) * self.basis
    }

    /// Rotate around `axis` in world space.
    pub fn rotate<A: Into<cgmath::Rad<f32>>>(&mut self, angle: A, axis: Vector3<f32>) {
        self.basis = Matrix4::from_axis_angle(axis, angle) * self.basis;
    }

    /// Scale the basis and the origin, so scaling a part also moves it
    /// proportionally closer to or further from the model root.
    pub fn scale(&mut self, factors: Vector3<f32>) {
        self.basis = self.basis
            * Matrix4::from_nonuniform_scale(factors.x, factors.y, factors.z);
        self.origin = Vector3::new(
            self.origin.x * factors.x,
            self.origin.y * factors.y,
            self.origin.z * factors.z,
        );
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(origin: Vector3<f32>) -> Self {
        Transform {
            origin,
            ..Default::default()
        }
    }
}

/// Placement for one queued draw: a base transform plus optional sub
/// transforms keyed by mesh name. Entries are transient; the draw queue
/// consumes them on flush.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelTransform {
    pub base: Transform,
    pub mesh: HashMap<String, Transform>,
}

impl ModelTransform {
    pub fn new(base: Transform) -> Self {
        Self {
            base,
            mesh: HashMap::new(),
        }
    }

    /// World matrix for one mesh of the model: the base placement, then the
    /// mesh's centering offset, then its sub-transform when one is set.
    pub fn matrix_for(&self, mesh_name: &str, offset: Vector3<f32>) -> Matrix4<f32> {
        let mut matrix = self.base.to_matrix() * Matrix4::from_translation(offset);
        if let Some(sub) = self.mesh.get(mesh_name) {
            matrix = matrix * sub.to_matrix();
        }
        matrix
    }
}

impl From<Vector3<f32>> for ModelTransform {
    fn from(origin: Vector3<f32>) -> Self {
        ModelTransform::new(origin.into())
    }
}

impl From<Transform> for ModelTransform {
    fn from(base: Transform) -> Self {
        ModelTransform::new(base)
    }
}
