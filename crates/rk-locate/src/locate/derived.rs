//! Default placement operations
//!
//! Each function builds one [`AffineTransform`] and hands it to
//! [`Transformable::apply_transform`]. They are what the provided
//! [`Locatable`](super::Locatable) methods call, and what an overriding
//! implementation calls once its guard has passed.

use glam::DVec3;

use super::{TransformOp, Transformable};
use crate::transform::{AffineTransform, Axis3D};

/// Translate `item` by `offset`
pub fn translate<T: Transformable>(item: &T, offset: DVec3) -> T {
    item.apply_transform(&AffineTransform::translation(offset))
}

/// Scale `item` by `factor` about the origin.
///
/// `factor` is not checked; zero or non-finite factors give degenerate
/// results.
pub fn scale<T: Transformable>(item: &T, factor: f64) -> T {
    item.apply_transform(&AffineTransform::scale(DVec3::ZERO, factor))
}

/// Scale `item` by `factor` about `center`
pub fn scale_about<T: Transformable>(item: &T, center: DVec3, factor: f64) -> T {
    item.apply_transform(&AffineTransform::scale(center, factor))
}

/// Rotate `item` by `angle` radians about `axis`
pub fn rotate<T: Transformable>(item: &T, axis: &Axis3D, angle: f64) -> T {
    item.apply_transform(&AffineTransform::rotation(axis, angle))
}

/// Apply `op` without consulting any guard
pub fn apply_op<T: Transformable>(item: &T, op: &TransformOp) -> T {
    item.apply_transform(&op.to_transform())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    impl Transformable for AffineTransform {
        fn apply_transform(&self, transform: &AffineTransform) -> Self {
            self.then(transform)
        }
    }

    #[test]
    fn test_translate_builds_translation() {
        let t = translate(&AffineTransform::identity(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(t, AffineTransform::translation(DVec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_translations_accumulate() {
        let t = translate(&AffineTransform::identity(), DVec3::new(1.0, 2.0, 3.0));
        let t = translate(&t, DVec3::new(-4.0, 0.5, 0.0));
        assert!(
            t.translation_part()
                .abs_diff_eq(DVec3::new(-3.0, 2.5, 3.0), 1e-12)
        );
    }

    #[test]
    fn test_scale_is_about_origin() {
        let t = translate(&AffineTransform::identity(), DVec3::new(1.0, 0.0, 0.0));
        let t = scale(&t, 2.0);
        assert!(t.translation_part().abs_diff_eq(DVec3::new(2.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_scale_about_keeps_center_fixed() {
        let center = DVec3::new(1.0, 2.0, 3.0);
        let t = scale_about(&AffineTransform::identity(), center, 4.0);
        assert!(t.transform_point(center).abs_diff_eq(center, 1e-12));
        assert_eq!(scale_about(&t, DVec3::ZERO, 0.25).linear(), glam::DMat3::IDENTITY);
    }

    #[test]
    fn test_rotate_half_turn() {
        let t = rotate(&AffineTransform::identity(), &Axis3D::z(), PI);
        assert!(t.transform_point(DVec3::X).abs_diff_eq(-DVec3::X, 1e-12));
    }

    #[test]
    fn test_apply_op_matches_direct_call() {
        let start = AffineTransform::translation(DVec3::ONE);
        let op = TransformOp::Translate {
            offset: DVec3::new(0.0, 0.0, 2.0),
        };
        assert_eq!(apply_op(&start, &op), translate(&start, DVec3::new(0.0, 0.0, 2.0)));
    }
}
