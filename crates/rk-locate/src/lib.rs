//! Capability-Based Placement for CAD Objects
//!
//! This crate provides:
//! - Affine transforms with explicit composition order
//! - The `Transformable` capability and the `Locatable` operations derived from it
//! - Reusable placement policies (e.g. no scaling after a translation)
//! - Abstract CAD kernel traits, with a pure Rust reference kernel
//! - Domain shapes that materialize into kernel solids on demand

pub mod config;
pub mod kernel;
pub mod locate;
pub mod shape;
pub mod transform;

// Re-exports for convenience
pub use config::{ConfigError, KernelChoice, LocateConfig};
pub use kernel::{
    BooleanType, BoundingBox, CadError, CadKernel, CadResult, EdgeId, EdgeInfo, NullKernel,
    ReferenceKernel, Solid, create_kernel, default_kernel,
};
pub use locate::policy::{AllOf, ForbidScale, ForbidScaleAfterTranslate, TransformPolicy, Unrestricted};
pub use locate::{LocateError, LocateResult, Locatable, TransformOp, Transformable};
pub use shape::{Dowel, FilletBox, Materialize, union_all};
pub use transform::{AffineTransform, Axis3D};
