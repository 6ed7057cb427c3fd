//! Placeable shapes
//!
//! Domain types hold their own parameters plus one accumulated
//! [`AffineTransform`](crate::transform::AffineTransform). Placement never
//! touches the kernel; [`Materialize::to_solid`] builds the shape from
//! scratch and applies the accumulated transform once, at the end.

mod dowel;
mod fillet_box;

pub use dowel::Dowel;
pub use fillet_box::FilletBox;

use crate::kernel::{BooleanType, CadError, CadKernel, CadResult, Solid};

/// Conversion of a domain object into a kernel solid
pub trait Materialize {
    /// Build the solid. Kernel errors are returned unchanged.
    fn to_solid(&self, kernel: &dyn CadKernel) -> CadResult<Solid>;
}

/// Materialize every item and union the results
pub fn union_all(kernel: &dyn CadKernel, items: &[&dyn Materialize]) -> CadResult<Solid> {
    let (first, rest) = items
        .split_first()
        .ok_or_else(|| CadError::OperationFailed("Nothing to union".into()))?;

    let mut solid = first.to_solid(kernel)?;
    for item in rest {
        let next = match item.to_solid(kernel) {
            Ok(next) => next,
            Err(e) => {
                kernel.release(&solid);
                return Err(e);
            }
        };
        let merged = kernel.boolean(&solid, &next, BooleanType::Union);
        kernel.release(&solid);
        kernel.release(&next);
        solid = merged?;
    }

    tracing::debug!("Union of {} items -> {}", items.len(), solid.id);
    Ok(solid)
}
