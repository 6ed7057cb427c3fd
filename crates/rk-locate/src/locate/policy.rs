//! Transform policies
//!
//! Reusable guards a [`Locatable`](super::Locatable) implementation can
//! consult before delegating to [`derived`](super::derived). Policies only
//! look at the accumulated transform and the requested operation, so the
//! same rule can be shared by unrelated types.

use super::{LocateError, LocateResult, TransformOp};
use crate::transform::AffineTransform;

/// A domain rule deciding whether an operation may be applied
pub trait TransformPolicy: Send + Sync {
    /// Return `Ok(())` to admit `op`, or a policy violation to reject it
    fn admit(&self, current: &AffineTransform, op: &TransformOp) -> LocateResult<()>;
}

/// Admits every operation
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl TransformPolicy for Unrestricted {
    fn admit(&self, _current: &AffineTransform, _op: &TransformOp) -> LocateResult<()> {
        Ok(())
    }
}

/// Rejects every scale (standard hardware has fixed sizes)
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidScale;

impl TransformPolicy for ForbidScale {
    fn admit(&self, _current: &AffineTransform, op: &TransformOp) -> LocateResult<()> {
        match op {
            TransformOp::Scale { .. } => Err(LocateError::policy(op, "object cannot be scaled")),
            _ => Ok(()),
        }
    }
}

/// Rejects a scale once the object has been moved away from the origin
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidScaleAfterTranslate {
    /// Translation components with `abs() <= tolerance` count as zero
    pub tolerance: f64,
}

impl ForbidScaleAfterTranslate {
    /// Create with a non-default tolerance
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl TransformPolicy for ForbidScaleAfterTranslate {
    fn admit(&self, current: &AffineTransform, op: &TransformOp) -> LocateResult<()> {
        if !matches!(op, TransformOp::Scale { .. }) {
            return Ok(());
        }

        let offset = current.translation_part();
        if offset.abs().max_element() > self.tolerance {
            return Err(LocateError::policy(
                op,
                format!(
                    "cannot scale a translated object (translation is ({}, {}, {}))",
                    offset.x, offset.y, offset.z
                ),
            ));
        }

        Ok(())
    }
}

/// Conjunction of policies; the first rejection wins
#[derive(Default)]
pub struct AllOf {
    policies: Vec<Box<dyn TransformPolicy>>,
}

impl AllOf {
    /// Create an empty conjunction (admits everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a policy
    pub fn with(mut self, policy: impl TransformPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Number of member policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if there are no member policies
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl std::fmt::Debug for AllOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllOf")
            .field("policies", &self.policies.len())
            .finish()
    }
}

impl TransformPolicy for AllOf {
    fn admit(&self, current: &AffineTransform, op: &TransformOp) -> LocateResult<()> {
        self.policies
            .iter()
            .try_for_each(|policy| policy.admit(current, op))
    }
}
