//! Cylindrical dowel pin

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::Materialize;
use crate::kernel::{CadKernel, CadResult, Solid};
use crate::locate::policy::{ForbidScale, TransformPolicy};
use crate::locate::{LocateResult, Locatable, TransformOp, Transformable};
use crate::transform::AffineTransform;

/// A standard-size pin: it can be moved and turned but never resized.
///
/// Untransformed, the pin stands on the XY plane along +Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dowel {
    radius: f64,
    length: f64,
    transform: AffineTransform,
}

impl Dowel {
    /// Create an untransformed pin
    pub fn new(radius: f64, length: f64) -> Self {
        Self {
            radius,
            length,
            transform: AffineTransform::identity(),
        }
    }

    /// Pin radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Pin length along its axis
    pub fn length(&self) -> f64 {
        self.length
    }

    /// All transforms applied so far
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }
}

impl Transformable for Dowel {
    fn apply_transform(&self, transform: &AffineTransform) -> Self {
        Self {
            transform: self.transform.then(transform),
            ..self.clone()
        }
    }
}

impl Locatable for Dowel {
    fn admit(&self, op: &TransformOp) -> LocateResult<()> {
        ForbidScale.admit(&self.transform, op)
    }
}

impl Materialize for Dowel {
    fn to_solid(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        let center = DVec3::new(0.0, 0.0, self.length * 0.5);
        let pin = kernel.create_cylinder(center, self.radius, self.length, DVec3::Z)?;
        let solid = kernel.transform(&pin, &self.transform);
        kernel.release(&pin);
        let solid = solid?;
        tracing::debug!(
            "Materialized dowel r={} l={} -> {}",
            self.radius,
            self.length,
            solid.id
        );
        Ok(solid)
    }
}
