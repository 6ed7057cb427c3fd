//! Box with every edge rounded

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::Materialize;
use crate::kernel::{CadKernel, CadResult, Solid};
use crate::locate::policy::{ForbidScaleAfterTranslate, TransformPolicy};
use crate::locate::{LocateResult, Locatable, TransformOp, Transformable};
use crate::transform::AffineTransform;

/// A box with all edges filleted.
///
/// The box spans `(0, 0, 0)` to `(length, width, height)` before its
/// transform is applied. Scaling is refused once the box has been
/// translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilletBox {
    length: f64,
    width: f64,
    height: f64,
    radius: f64,
    transform: AffineTransform,
}

impl FilletBox {
    /// Create an untransformed box
    pub fn new(length: f64, width: f64, height: f64, radius: f64) -> Self {
        Self::with_transform(length, width, height, radius, AffineTransform::identity())
    }

    /// Create a box carrying an existing transform
    pub fn with_transform(
        length: f64,
        width: f64,
        height: f64,
        radius: f64,
        transform: AffineTransform,
    ) -> Self {
        Self {
            length,
            width,
            height,
            radius,
            transform,
        }
    }

    /// Extent along X
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Extent along Y
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Extent along Z
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Fillet radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// All transforms applied so far
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    fn size(&self) -> DVec3 {
        DVec3::new(self.length, self.width, self.height)
    }
}

impl Transformable for FilletBox {
    fn apply_transform(&self, transform: &AffineTransform) -> Self {
        Self {
            transform: self.transform.then(transform),
            ..self.clone()
        }
    }
}

impl Locatable for FilletBox {
    fn admit(&self, op: &TransformOp) -> LocateResult<()> {
        ForbidScaleAfterTranslate::default().admit(&self.transform, op)
    }
}

impl Materialize for FilletBox {
    fn to_solid(&self, kernel: &dyn CadKernel) -> CadResult<Solid> {
        let size = self.size();
        let prism = kernel.create_box(size * 0.5, size)?;

        let rounded = kernel.get_edges(&prism).and_then(|edges| {
            let ids: Vec<_> = edges.into_iter().map(|e| e.id).collect();
            kernel.fillet(&prism, &ids, self.radius)
        });
        kernel.release(&prism);
        let rounded = rounded?;

        let solid = kernel.transform(&rounded, &self.transform);
        kernel.release(&rounded);
        let solid = solid?;
        tracing::debug!(
            "Materialized fillet box {}x{}x{} r={} on {} kernel -> {}",
            self.length,
            self.width,
            self.height,
            self.radius,
            kernel.name(),
            solid.id
        );
        Ok(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{CadError, NullKernel, ReferenceKernel};
    use crate::transform::Axis3D;
    use approx::assert_relative_eq;

    fn sample() -> FilletBox {
        FilletBox::new(10.0, 8.0, 5.0, 1.0)
    }

    #[test]
    fn test_new_box_has_identity_transform() {
        let b = sample();
        assert_eq!(b.transform(), &AffineTransform::identity());
        assert_eq!(b.length(), 10.0);
        assert_eq!(b.width(), 8.0);
        assert_eq!(b.height(), 5.0);
        assert_eq!(b.radius(), 1.0);
    }

    #[test]
    fn test_translate_keeps_parameters() {
        let b = sample();
        let moved = b.translate(DVec3::new(1.0, 2.0, 3.0)).unwrap();

        assert_eq!(moved.length(), 10.0);
        assert_eq!(moved.radius(), 1.0);
        assert_eq!(moved.transform().translation_part(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, sample());
    }

    #[test]
    fn test_scale_untranslated() {
        let b = sample();
        let scaled = b.scale(2.0).unwrap();

        // dimensions stay, the scale lives in the transform
        assert_eq!(scaled.length(), 10.0);
        assert_relative_eq!(scaled.transform().linear().determinant(), 8.0);
        assert_eq!(b, sample());
    }

    #[test]
    fn test_scale_after_translate_rejected() {
        let moved = sample().translate(DVec3::new(1.0, 2.0, 3.0)).unwrap();
        let err = moved.scale(2.0).unwrap_err();
        assert!(err.is_policy_violation());
    }

    #[test]
    fn test_scale_after_rotation_allowed() {
        let turned = sample().rotate(&Axis3D::z(), 0.5).unwrap();
        assert!(turned.scale(3.0).is_ok());
    }

    #[test]
    fn test_apply_transform_composes_existing_then_new() {
        let first = AffineTransform::translation(DVec3::X);
        let second = AffineTransform::scale(DVec3::ZERO, 2.0);
        let b = FilletBox::with_transform(1.0, 1.0, 1.0, 0.1, first);

        let out = b.apply_transform(&second);
        assert_eq!(out.transform(), &first.then(&second));
        assert_eq!(b.transform(), &first);
    }

    #[test]
    fn test_materialize_translated() {
        let kernel = ReferenceKernel::new();
        let b = sample();
        let base = kernel.bounding_box(&b.to_solid(&kernel).unwrap()).unwrap();

        let moved = b.translate(DVec3::new(1.0, 2.0, 3.0)).unwrap();
        let bbox = kernel.bounding_box(&moved.to_solid(&kernel).unwrap()).unwrap();

        assert!(base.center().abs_diff_eq(DVec3::new(5.0, 4.0, 2.5), 1e-12));
        assert!(
            bbox.center()
                .abs_diff_eq(base.center() + DVec3::new(1.0, 2.0, 3.0), 1e-12)
        );
        assert!(bbox.size().abs_diff_eq(base.size(), 1e-12));
    }

    #[test]
    fn test_materialize_scaled_volume() {
        let kernel = ReferenceKernel::new();
        let b = sample();
        let v1 = kernel.volume(&b.to_solid(&kernel).unwrap()).unwrap();
        let v2 = kernel
            .volume(&b.scale(2.0).unwrap().to_solid(&kernel).unwrap())
            .unwrap();
        assert_relative_eq!(v2, 8.0 * v1, max_relative = 1e-12);
    }

    #[test]
    fn test_kernel_errors_propagate() {
        let kernel = ReferenceKernel::new();
        let too_round = FilletBox::new(10.0, 8.0, 5.0, 3.0);
        assert!(matches!(
            too_round.to_solid(&kernel),
            Err(CadError::InvalidFillet(_))
        ));

        let flat = FilletBox::new(10.0, 0.0, 5.0, 1.0);
        assert!(matches!(
            flat.to_solid(&kernel),
            Err(CadError::InvalidDimensions(_))
        ));

        assert!(matches!(
            sample().to_solid(&NullKernel),
            Err(CadError::KernelNotAvailable(_))
        ));
    }

    #[test]
    fn test_materialize_releases_intermediates() {
        let kernel = ReferenceKernel::new();
        sample().to_solid(&kernel).unwrap();
        assert_eq!(kernel.solid_count(), 1);

        FilletBox::new(10.0, 8.0, 5.0, 3.0).to_solid(&kernel).unwrap_err();
        assert_eq!(kernel.solid_count(), 1);
    }

    #[test]
    fn test_scale_op_about_point() {
        let op = TransformOp::Scale {
            center: DVec3::new(5.0, 4.0, 2.5),
            factor: 2.0,
        };
        let scaled = sample().apply(&op).unwrap();
        assert!(
            scaled
                .transform()
                .transform_point(DVec3::new(5.0, 4.0, 2.5))
                .abs_diff_eq(DVec3::new(5.0, 4.0, 2.5), 1e-12)
        );

        let moved = sample().translate(DVec3::X).unwrap();
        assert!(moved.apply(&op).unwrap_err().is_policy_violation());
    }

    #[test]
    fn test_serde_round_trip() {
        let b = sample()
            .rotate(&Axis3D::x(), 0.25)
            .unwrap()
            .translate(DVec3::new(1.0, 2.0, 3.0))
            .unwrap();
        let text = ron::to_string(&b).unwrap();
        let back: FilletBox = ron::from_str(&text).unwrap();
        assert_eq!(back, b);
    }
}
