//! Placement capability and derived operations
//!
//! A type becomes placeable by implementing [`Transformable`], a single
//! method that returns a transformed copy. Opting into [`Locatable`] (usually
//! with an empty `impl`) then provides `translate`, `scale` and `rotate`.
//! A type can override any of those to guard it with a domain rule, and
//! fall back to the free functions in [`derived`] for the actual work.

pub mod derived;
pub mod policy;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::CadError;
use crate::transform::{AffineTransform, Axis3D};

/// Placement-related errors
#[derive(Debug, Clone, Error)]
pub enum LocateError {
    /// A domain rule rejected an otherwise well-formed operation
    #[error("{operation} rejected: {reason}")]
    PolicyViolation {
        /// Name of the rejected operation
        operation: &'static str,
        /// Why the rule rejected it
        reason: String,
    },

    #[error("CAD kernel error: {0}")]
    Kernel(#[from] CadError),
}

impl LocateError {
    /// Create a policy violation for `op`
    pub fn policy(op: &TransformOp, reason: impl Into<String>) -> Self {
        LocateError::PolicyViolation {
            operation: op.name(),
            reason: reason.into(),
        }
    }

    /// Check if this is a business-rule rejection rather than a kernel fault
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, LocateError::PolicyViolation { .. })
    }
}

/// Result type for placement operations
pub type LocateResult<T> = Result<T, LocateError>;

/// A requested placement operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformOp {
    /// Move by an offset
    Translate {
        /// Offset vector
        offset: DVec3,
    },
    /// Uniform scale about a point
    Scale {
        /// Fixed point of the scale
        center: DVec3,
        /// Scale factor
        factor: f64,
    },
    /// Rotate about an axis
    Rotate {
        /// Rotation axis
        axis: Axis3D,
        /// Angle in radians
        angle: f64,
    },
}

impl TransformOp {
    /// Get the operation name
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Translate { .. } => "translate",
            TransformOp::Scale { .. } => "scale",
            TransformOp::Rotate { .. } => "rotate",
        }
    }

    /// Build the transform this operation stands for
    pub fn to_transform(&self) -> AffineTransform {
        match self {
            TransformOp::Translate { offset } => AffineTransform::translation(*offset),
            TransformOp::Scale { center, factor } => AffineTransform::scale(*center, *factor),
            TransformOp::Rotate { axis, angle } => AffineTransform::rotation(axis, *angle),
        }
    }
}

/// The one capability a placeable type must provide.
///
/// Implementations return a new value of the same type that keeps every
/// shape parameter and carries `existing.then(transform)` as its
/// accumulated transform. The receiver is left untouched.
pub trait Transformable: Sized {
    /// Make a copy of `self` with `transform` applied after any existing one
    fn apply_transform(&self, transform: &AffineTransform) -> Self;
}

/// Placement operations derived from [`Transformable`].
///
/// Every provided method first asks [`Locatable::admit`] whether the
/// requested operation is allowed, then delegates to [`derived`]. A type
/// attaches a domain rule by overriding `admit`. A type whose placement
/// does more than compose a transform (e.g. rewriting its own parameters)
/// overrides the operation itself and calls `admit` before doing its work.
///
/// `scale` is `scale_about` the origin, so overriding `scale_about` covers
/// both.
pub trait Locatable: Transformable {
    /// Guard hook; the default admits everything
    fn admit(&self, _op: &TransformOp) -> LocateResult<()> {
        Ok(())
    }

    /// Translate by `offset`
    fn translate(&self, offset: DVec3) -> LocateResult<Self> {
        self.admit(&TransformOp::Translate { offset })?;
        Ok(derived::translate(self, offset))
    }

    /// Scale uniformly about the origin
    fn scale(&self, factor: f64) -> LocateResult<Self> {
        self.scale_about(DVec3::ZERO, factor)
    }

    /// Scale uniformly about `center`
    fn scale_about(&self, center: DVec3, factor: f64) -> LocateResult<Self> {
        self.admit(&TransformOp::Scale { center, factor })?;
        Ok(derived::scale_about(self, center, factor))
    }

    /// Rotate by `angle` radians about `axis`
    fn rotate(&self, axis: &Axis3D, angle: f64) -> LocateResult<Self> {
        self.admit(&TransformOp::Rotate { axis: *axis, angle })?;
        Ok(derived::rotate(self, axis, angle))
    }

    /// Apply a single operation through the (possibly overridden) methods above
    fn apply(&self, op: &TransformOp) -> LocateResult<Self> {
        match op {
            TransformOp::Translate { offset } => self.translate(*offset),
            TransformOp::Scale { center, factor } => self.scale_about(*center, *factor),
            TransformOp::Rotate { axis, angle } => self.rotate(axis, *angle),
        }
    }

    /// Apply operations in order; the first rejection aborts the whole chain
    fn apply_all<'a>(&self, ops: impl IntoIterator<Item = &'a TransformOp>) -> LocateResult<Self>
    where
        Self: Clone,
    {
        let mut current = self.clone();
        for op in ops {
            current = current.apply(op)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A bare point, the smallest possible placeable type
    #[derive(Debug, Clone, PartialEq)]
    struct Marker {
        transform: AffineTransform,
    }

    impl Transformable for Marker {
        fn apply_transform(&self, transform: &AffineTransform) -> Self {
            Marker {
                transform: self.transform.then(transform),
            }
        }
    }

    impl Locatable for Marker {}

    /// Refuses every rotation
    #[derive(Debug, Clone)]
    struct NoRotate(Marker);

    impl Transformable for NoRotate {
        fn apply_transform(&self, transform: &AffineTransform) -> Self {
            NoRotate(self.0.apply_transform(transform))
        }
    }

    impl Locatable for NoRotate {
        fn rotate(&self, _axis: &Axis3D, _angle: f64) -> LocateResult<Self> {
            Err(LocateError::PolicyViolation {
                operation: "rotate",
                reason: "fixed orientation".into(),
            })
        }
    }

    fn origin(m: &Marker) -> DVec3 {
        m.transform.transform_point(DVec3::ZERO)
    }

    #[test]
    fn test_default_methods_delegate() {
        let m = Marker {
            transform: AffineTransform::identity(),
        };
        let moved = m.translate(DVec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(origin(&moved), DVec3::new(1.0, 2.0, 3.0));

        let scaled = moved.scale(2.0).unwrap();
        assert!(origin(&scaled).abs_diff_eq(DVec3::new(2.0, 4.0, 6.0), 1e-12));

        // receiver untouched
        assert_eq!(m.transform, AffineTransform::identity());
    }

    #[test]
    fn test_apply_routes_through_overrides() {
        let n = NoRotate(Marker {
            transform: AffineTransform::identity(),
        });
        let op = TransformOp::Rotate {
            axis: Axis3D::z(),
            angle: 1.0,
        };
        let err = n.apply(&op).unwrap_err();
        assert!(err.is_policy_violation());

        let ok = n.apply(&TransformOp::Translate { offset: DVec3::X }).unwrap();
        assert_eq!(ok.0.transform.translation_part(), DVec3::X);
    }

    #[test]
    fn test_apply_all_stops_at_first_rejection() {
        let n = NoRotate(Marker {
            transform: AffineTransform::identity(),
        });
        let ops = [
            TransformOp::Translate { offset: DVec3::X },
            TransformOp::Rotate {
                axis: Axis3D::z(),
                angle: 0.5,
            },
            TransformOp::Translate { offset: DVec3::Y },
        ];
        assert!(n.apply_all(&ops).is_err());
        assert_eq!(n.0.transform, AffineTransform::identity());
    }

    #[test]
    fn test_scale_op_about_point() {
        let m = Marker {
            transform: AffineTransform::translation(DVec3::new(2.0, 0.0, 0.0)),
        };
        let op = TransformOp::Scale {
            center: DVec3::new(1.0, 0.0, 0.0),
            factor: 3.0,
        };
        let scaled = m.apply(&op).unwrap();
        assert!(origin(&scaled).abs_diff_eq(DVec3::new(4.0, 0.0, 0.0), 1e-12));
    }

    /// Scaling rewrites `size` instead of composing a linear part
    #[derive(Debug, Clone, PartialEq)]
    struct Resizable {
        size: f64,
        transform: AffineTransform,
    }

    impl Transformable for Resizable {
        fn apply_transform(&self, transform: &AffineTransform) -> Self {
            Resizable {
                size: self.size,
                transform: self.transform.then(transform),
            }
        }
    }

    impl Locatable for Resizable {
        fn scale_about(&self, center: DVec3, factor: f64) -> LocateResult<Self> {
            self.admit(&TransformOp::Scale { center, factor })?;
            let origin = self.transform.translation_part();
            let shift = (origin - center) * (factor - 1.0);
            Ok(Resizable {
                size: self.size * factor,
                transform: self.transform.then(&AffineTransform::translation(shift)),
            })
        }
    }

    /// Only scales about the origin are allowed
    #[derive(Debug, Clone)]
    struct OriginScaleOnly(Marker);

    impl Transformable for OriginScaleOnly {
        fn apply_transform(&self, transform: &AffineTransform) -> Self {
            OriginScaleOnly(self.0.apply_transform(transform))
        }
    }

    impl Locatable for OriginScaleOnly {
        fn admit(&self, op: &TransformOp) -> LocateResult<()> {
            match op {
                TransformOp::Scale { center, .. } if *center != DVec3::ZERO => {
                    Err(LocateError::policy(op, "scale center must be the origin"))
                }
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn test_scale_ops_reach_parameter_rewriting_override() {
        let r = Resizable {
            size: 1.0,
            transform: AffineTransform::identity(),
        };

        let at_origin = r
            .apply(&TransformOp::Scale {
                center: DVec3::ZERO,
                factor: 2.0,
            })
            .unwrap();
        let off_origin = r
            .apply(&TransformOp::Scale {
                center: DVec3::new(1e-9, 0.0, 0.0),
                factor: 2.0,
            })
            .unwrap();

        assert_eq!(at_origin, r.scale(2.0).unwrap());
        for scaled in [&at_origin, &off_origin] {
            assert_eq!(scaled.size, 2.0);
            assert_eq!(scaled.transform.linear().determinant(), 1.0);
        }
        assert!(
            off_origin
                .transform
                .translation_part()
                .abs_diff_eq(DVec3::new(-1e-9, 0.0, 0.0), 1e-18)
        );
    }

    #[test]
    fn test_guard_sees_requested_scale_center() {
        let o = OriginScaleOnly(Marker {
            transform: AffineTransform::identity(),
        });
        assert!(o.scale(2.0).is_ok());
        assert!(
            o.apply(&TransformOp::Scale {
                center: DVec3::ZERO,
                factor: 2.0
            })
            .is_ok()
        );

        let err = o
            .apply(&TransformOp::Scale {
                center: DVec3::X,
                factor: 2.0,
            })
            .unwrap_err();
        assert!(err.is_policy_violation());
        assert!(o.scale_about(DVec3::X, 2.0).is_err());
    }

    #[test]
    fn test_op_names() {
        assert_eq!(TransformOp::Translate { offset: DVec3::ZERO }.name(), "translate");
        assert_eq!(
            TransformOp::Scale {
                center: DVec3::ZERO,
                factor: 1.0
            }
            .name(),
            "scale"
        );
        let err = LocateError::policy(
            &TransformOp::Scale {
                center: DVec3::ZERO,
                factor: 2.0,
            },
            "nope",
        );
        assert_eq!(err.to_string(), "scale rejected: nope");
    }
}
