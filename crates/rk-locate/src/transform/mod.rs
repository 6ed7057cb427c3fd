//! Affine transforms
//!
//! A composable translation/rotation/scale operator. Transforms are plain
//! `Copy` values: every constructor builds a fresh one and composition
//! returns a new transform instead of modifying either operand.

use glam::{DAffine3, DMat3, DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Axis definition for rotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis3D {
    /// Point the axis passes through
    pub origin: DVec3,
    /// Direction of the axis (normalized)
    pub direction: DVec3,
}

impl Axis3D {
    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// X axis at origin
    pub fn x() -> Self {
        Self::new(DVec3::ZERO, DVec3::X)
    }

    /// Y axis at origin
    pub fn y() -> Self {
        Self::new(DVec3::ZERO, DVec3::Y)
    }

    /// Z axis at origin
    pub fn z() -> Self {
        Self::new(DVec3::ZERO, DVec3::Z)
    }
}

/// An affine transform in 3D space.
///
/// `a.then(&b)` is the transform that applies `a` first and `b` second.
/// Composition is associative but not commutative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    affine: DAffine3,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<DAffine3> for AffineTransform {
    fn from(affine: DAffine3) -> Self {
        Self { affine }
    }
}

impl AffineTransform {
    /// The neutral transform
    pub fn identity() -> Self {
        Self {
            affine: DAffine3::IDENTITY,
        }
    }

    /// Pure translation by `offset`
    pub fn translation(offset: DVec3) -> Self {
        Self {
            affine: DAffine3::from_translation(offset),
        }
    }

    /// Uniform scale by `factor` about `center`
    pub fn scale(center: DVec3, factor: f64) -> Self {
        Self::scale_xyz(center, DVec3::splat(factor))
    }

    /// Per-axis scale about `center`
    pub fn scale_xyz(center: DVec3, factors: DVec3) -> Self {
        Self::about(center, DAffine3::from_scale(factors))
    }

    /// Rotation by `angle` radians about `axis` (right-hand rule)
    pub fn rotation(axis: &Axis3D, angle: f64) -> Self {
        Self::about(
            axis.origin,
            DAffine3::from_axis_angle(axis.direction, angle),
        )
    }

    /// Conjugate `linear` so that it acts about `center` instead of the origin
    fn about(center: DVec3, linear: DAffine3) -> Self {
        Self {
            affine: DAffine3::from_translation(center)
                * linear
                * DAffine3::from_translation(-center),
        }
    }

    /// Compose two transforms: apply `first`, then `second`
    pub fn compose(first: &AffineTransform, second: &AffineTransform) -> Self {
        first.then(second)
    }

    /// Apply `self`, then `next`
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self {
            affine: next.affine * self.affine,
        }
    }

    /// The inverse transform.
    ///
    /// The transform must be invertible; a zero scale yields non-finite
    /// components.
    pub fn inverse(&self) -> Self {
        Self {
            affine: self.affine.inverse(),
        }
    }

    /// Translation component (where the origin ends up)
    pub fn translation_part(&self) -> DVec3 {
        self.affine.translation
    }

    /// Linear (rotation/scale) component
    pub fn linear(&self) -> DMat3 {
        self.affine.matrix3
    }

    /// Homogeneous 4x4 matrix (column-major)
    pub fn matrix(&self) -> DMat4 {
        DMat4::from(self.affine)
    }

    /// Underlying glam affine
    pub fn as_affine(&self) -> &DAffine3 {
        &self.affine
    }

    /// Transform a point (translation applies)
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.affine.transform_point3(point)
    }

    /// Transform a direction (translation ignored)
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.affine.transform_vector3(vector)
    }

    /// Check whether this is the identity within `tolerance`
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.abs_diff_eq(&Self::identity(), tolerance)
    }

    /// Component-wise comparison within `tolerance`
    pub fn abs_diff_eq(&self, other: &AffineTransform, tolerance: f64) -> bool {
        self.affine.abs_diff_eq(other.affine, tolerance)
    }

    /// Check that every component is finite
    pub fn is_finite(&self) -> bool {
        self.affine.is_finite()
    }
}
