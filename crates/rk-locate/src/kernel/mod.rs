//! CAD Kernel Abstraction
//!
//! The geometry kernel is an external collaborator: placement code only
//! talks to it through [`CadKernel`], and only when a domain object is
//! materialized.

mod bounds;
mod reference;
mod traits;
#[cfg(feature = "truck")]
mod truck;

pub use bounds::BoundingBox;
pub use reference::{DEFAULT_TOLERANCE, ReferenceKernel};
pub use traits::{
    BooleanType, CadError, CadKernel, CadResult, EdgeId, EdgeInfo, NullKernel, Solid,
};
#[cfg(feature = "truck")]
pub use truck::TruckKernel;

use crate::config::{KernelChoice, LocateConfig};

/// Build the kernel selected by `config`
pub fn create_kernel(config: &LocateConfig) -> Box<dyn CadKernel> {
    match config.kernel {
        KernelChoice::Reference => Box::new(ReferenceKernel::with_tolerance(config.tolerance)),
        KernelChoice::Null => Box::new(NullKernel),
        #[cfg(feature = "truck")]
        KernelChoice::Truck => Box::new(TruckKernel::new()),
        #[cfg(not(feature = "truck"))]
        KernelChoice::Truck => {
            tracing::warn!(
                "Truck kernel requested but the `truck` feature is disabled; using reference kernel"
            );
            Box::new(ReferenceKernel::with_tolerance(config.tolerance))
        }
    }
}

/// Get the default CAD kernel.
///
/// Always the reference kernel: it is the only backend that supports every
/// operation the shapes need. Other backends are selected explicitly via
/// [`create_kernel`].
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(ReferenceKernel::new())
}
