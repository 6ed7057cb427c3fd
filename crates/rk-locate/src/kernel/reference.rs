//! Reference CAD Kernel Backend
//!
//! Pure Rust analytic kernel. A solid is a list of placed primitives
//! (blocks, optionally with every edge rounded, and cylinders), each
//! carrying the affine placement that maps its local frame into world
//! space. Bounding boxes and volumes are computed in closed form, so they
//! are exact for any affine placement, including non-uniform scale.
//!
//! Unions are kept as compounds of pieces; subtraction and intersection
//! are not supported.

use glam::{DAffine3, DMat3, DQuat, DVec3};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::f64::consts::PI;
use uuid::Uuid;

use super::{
    BooleanType, BoundingBox, CadError, CadKernel, CadResult, EdgeId, EdgeInfo, Solid,
};
use crate::transform::AffineTransform;

/// Default linear tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Corner index pairs of the 12 block edges.
///
/// Corner `i` has +X when bit 0 is set, +Y for bit 1 and +Z for bit 2.
const BLOCK_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// A primitive in its local frame
#[derive(Debug, Clone, Copy)]
enum Primitive {
    /// Block centered at the origin
    Block {
        size: DVec3,
        /// Radius of the rounding applied to all edges
        fillet: Option<f64>,
    },
    /// Cylinder along +Z centered at the origin
    Cylinder { radius: f64, height: f64 },
}

/// A primitive placed in world space
#[derive(Debug, Clone, Copy)]
struct Piece {
    primitive: Primitive,
    placement: DAffine3,
}

impl Piece {
    fn block_corners(half: DVec3) -> [DVec3; 8] {
        std::array::from_fn(|i| {
            DVec3::new(
                if i & 1 != 0 { half.x } else { -half.x },
                if i & 2 != 0 { half.y } else { -half.y },
                if i & 4 != 0 { half.z } else { -half.z },
            )
        })
    }

    fn bounding_box(&self) -> BoundingBox {
        let linear = self.placement.matrix3;
        match self.primitive {
            Primitive::Block { size, fillet } => {
                // A rounded block is its inner block swept by a ball; the
                // ball's image is an ellipsoid whose extent along world axis
                // i is r * |row i of the linear part|.
                let r = fillet.unwrap_or(0.0);
                let corners = Self::block_corners(size * 0.5 - DVec3::splat(r));
                let margin = DVec3::new(
                    linear.row(0).length(),
                    linear.row(1).length(),
                    linear.row(2).length(),
                ) * r;
                BoundingBox::from_points(corners.map(|c| self.placement.transform_point3(c)))
                    .grow(margin)
            }
            Primitive::Cylinder { radius, height } => {
                // Axis segment swept by a disk in the local XY plane
                let half = DVec3::new(0.0, 0.0, height * 0.5);
                let ends = [
                    self.placement.transform_point3(-half),
                    self.placement.transform_point3(half),
                ];
                let disk = |i: usize| {
                    let row = linear.row(i);
                    (row.x * row.x + row.y * row.y).sqrt()
                };
                let margin = DVec3::new(disk(0), disk(1), disk(2)) * radius;
                BoundingBox::from_points(ends).grow(margin)
            }
        }
    }

    fn volume(&self) -> f64 {
        let local = match self.primitive {
            Primitive::Block { size, fillet } => {
                let r = fillet.unwrap_or(0.0);
                let inner = size - DVec3::splat(2.0 * r);
                let (a, b, c) = (inner.x, inner.y, inner.z);
                a * b * c
                    + 2.0 * r * (a * b + b * c + c * a)
                    + PI * r * r * (a + b + c)
                    + 4.0 / 3.0 * PI * r * r * r
            }
            Primitive::Cylinder { radius, height } => PI * radius * radius * height,
        };
        local * self.placement.matrix3.determinant().abs()
    }
}

/// Solid data held by the reference kernel
#[derive(Debug, Clone)]
struct AnalyticSolid {
    pieces: Vec<Piece>,
}

impl AnalyticSolid {
    fn single(primitive: Primitive, placement: DAffine3) -> Self {
        Self {
            pieces: vec![Piece {
                primitive,
                placement,
            }],
        }
    }
}

/// Analytic reference kernel
pub struct ReferenceKernel {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, AnalyticSolid>>,
    /// Linear tolerance for degenerate-geometry checks
    tolerance: f64,
}

impl ReferenceKernel {
    /// Create a new reference kernel
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Create a kernel with a custom linear tolerance
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
            tolerance,
        }
    }

    /// Linear tolerance in use
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of solids held by the kernel
    pub fn solid_count(&self) -> usize {
        self.solids.lock().len()
    }

    /// Store a solid and return a Solid reference
    fn store_solid(&self, solid: AnalyticSolid) -> Solid {
        let id = Uuid::new_v4();
        self.solids.lock().insert(id, solid);
        Solid::new(id).with_kernel_data()
    }

    /// Get a stored solid by ID
    fn get_solid(&self, solid: &Solid) -> CadResult<AnalyticSolid> {
        self.solids
            .lock()
            .get(&solid.id)
            .cloned()
            .ok_or(CadError::SolidNotFound(solid.id))
    }

    /// Get the only piece of a solid, rejecting compounds
    fn single_piece(&self, solid: &Solid, what: &str) -> CadResult<Piece> {
        let data = self.get_solid(solid)?;
        match data.pieces.as_slice() {
            [piece] => Ok(*piece),
            _ => Err(CadError::OperationFailed(format!(
                "{what} of compound solids is not supported by the reference kernel"
            ))),
        }
    }

    fn check_length(&self, name: &str, value: f64) -> CadResult<()> {
        if !value.is_finite() || value <= self.tolerance {
            return Err(CadError::InvalidDimensions(format!(
                "{name} must be greater than {}, got {value}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Uniform scale of a similarity transform, or None if it shears or
    /// scales unevenly
    fn similarity_scale(&self, placement: &DAffine3) -> Option<f64> {
        let linear = placement.matrix3;
        let scale = linear.determinant().abs().cbrt();
        let gram = linear.transpose() * linear;
        let expected = DMat3::from_diagonal(DVec3::splat(scale * scale));
        gram.abs_diff_eq(expected, 1e-9 * (scale * scale).max(1.0))
            .then_some(scale)
    }
}

impl Default for ReferenceKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for ReferenceKernel {
    fn name(&self) -> &str {
        "reference"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid> {
        self.check_length("Box length", size.x)?;
        self.check_length("Box width", size.y)?;
        self.check_length("Box height", size.z)?;

        let solid = self.store_solid(AnalyticSolid::single(
            Primitive::Block { size, fillet: None },
            DAffine3::from_translation(center),
        ));
        tracing::debug!("Created box {} (size {:?}) at {:?}", solid.id, size, center);
        Ok(solid)
    }

    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
    ) -> CadResult<Solid> {
        self.check_length("Cylinder radius", radius)?;
        self.check_length("Cylinder height", height)?;
        self.check_length("Cylinder axis length", axis.length())?;

        let rotation = DQuat::from_rotation_arc(DVec3::Z, axis.normalize());
        let solid = self.store_solid(AnalyticSolid::single(
            Primitive::Cylinder { radius, height },
            DAffine3::from_rotation_translation(rotation, center),
        ));
        tracing::debug!(
            "Created cylinder {} (r={}, h={}) at {:?}",
            solid.id,
            radius,
            height,
            center
        );
        Ok(solid)
    }

    fn get_edges(&self, solid: &Solid) -> CadResult<Vec<EdgeInfo>> {
        let piece = self.single_piece(solid, "Edge enumeration")?;
        match piece.primitive {
            Primitive::Block { fillet: Some(_), .. } => Err(CadError::OperationFailed(
                "Edge enumeration of filleted blocks is not supported by the reference kernel"
                    .into(),
            )),
            Primitive::Block { size, fillet: None } => {
                let corners = Piece::block_corners(size * 0.5)
                    .map(|c| piece.placement.transform_point3(c));
                Ok(BLOCK_EDGES
                    .iter()
                    .enumerate()
                    .map(|(i, &(a, b))| {
                        EdgeInfo::new(EdgeId::new(solid.id, i as u32), corners[a], corners[b])
                    })
                    .collect())
            }
            Primitive::Cylinder { radius, height } => {
                let half = height * 0.5;
                Ok([-half, half]
                    .iter()
                    .enumerate()
                    .map(|(i, &z)| {
                        EdgeInfo::circle(
                            EdgeId::new(solid.id, i as u32),
                            piece.placement.transform_point3(DVec3::new(0.0, 0.0, z)),
                            piece.placement.transform_point3(DVec3::new(radius, 0.0, z)),
                        )
                    })
                    .collect())
            }
        }
    }

    fn fillet(&self, solid: &Solid, edges: &[EdgeId], radius: f64) -> CadResult<Solid> {
        let piece = self.single_piece(solid, "Fillet")?;

        let size = match piece.primitive {
            Primitive::Block { size, fillet: None } => size,
            Primitive::Block { fillet: Some(_), .. } => {
                return Err(CadError::InvalidFillet("Block is already filleted".into()));
            }
            Primitive::Cylinder { .. } => {
                return Err(CadError::OperationFailed(
                    "Cylinder fillet is not supported by the reference kernel".into(),
                ));
            }
        };

        let mut selected = [false; BLOCK_EDGES.len()];
        for edge in edges {
            if edge.solid_id != solid.id || edge.index as usize >= BLOCK_EDGES.len() {
                return Err(CadError::InvalidFillet(format!(
                    "Edge {} of solid {} does not belong to solid {}",
                    edge.index, edge.solid_id, solid.id
                )));
            }
            selected[edge.index as usize] = true;
        }
        if !selected.iter().all(|&s| s) {
            return Err(CadError::OperationFailed(
                "The reference kernel can only fillet all edges of a block".into(),
            ));
        }

        let scale = self.similarity_scale(&piece.placement).ok_or_else(|| {
            CadError::OperationFailed(
                "Cannot fillet a block that is sheared or unevenly scaled".into(),
            )
        })?;

        if !radius.is_finite() || radius <= self.tolerance {
            return Err(CadError::InvalidFillet(format!(
                "Fillet radius must be positive, got {radius}"
            )));
        }
        let local_radius = radius / scale;
        if 2.0 * local_radius >= size.min_element() - self.tolerance {
            return Err(CadError::InvalidFillet(format!(
                "Fillet radius {radius} is too large for a block of size {:?}",
                size * scale
            )));
        }

        let filleted = self.store_solid(AnalyticSolid::single(
            Primitive::Block {
                size,
                fillet: Some(local_radius),
            },
            piece.placement,
        ));
        tracing::debug!("Filleted {} -> {} (r={})", solid.id, filleted.id, radius);
        Ok(filleted)
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let a_data = self.get_solid(a)?;
        let b_data = self.get_solid(b)?;

        match op {
            BooleanType::Union => {
                let mut pieces = a_data.pieces;
                pieces.extend(b_data.pieces);
                let result = self.store_solid(AnalyticSolid { pieces });
                tracing::debug!("Union {} + {} -> {}", a.id, b.id, result.id);
                Ok(result)
            }
            BooleanType::Subtract | BooleanType::Intersect => Err(CadError::BooleanFailed(
                format!("{op:?} is not supported by the reference kernel"),
            )),
        }
    }

    fn transform(&self, solid: &Solid, transform: &AffineTransform) -> CadResult<Solid> {
        if !transform.is_finite() {
            return Err(CadError::OperationFailed(
                "Transform has non-finite components".into(),
            ));
        }

        let data = self.get_solid(solid)?;
        let affine = *transform.as_affine();
        let pieces = data
            .pieces
            .into_iter()
            .map(|piece| Piece {
                primitive: piece.primitive,
                placement: affine * piece.placement,
            })
            .collect();

        let result = self.store_solid(AnalyticSolid { pieces });
        tracing::debug!("Transformed {} -> {}", solid.id, result.id);
        Ok(result)
    }

    fn bounding_box(&self, solid: &Solid) -> CadResult<BoundingBox> {
        let data = self.get_solid(solid)?;
        Ok(data
            .pieces
            .iter()
            .fold(BoundingBox::empty(), |bbox, piece| {
                bbox.union(&piece.bounding_box())
            }))
    }

    fn volume(&self, solid: &Solid) -> CadResult<f64> {
        Ok(self.single_piece(solid, "Volume")?.volume())
    }

    fn release(&self, solid: &Solid) -> bool {
        let removed = self.solids.lock().remove(&solid.id).is_some();
        if removed {
            tracing::debug!("Released {}", solid.id);
        }
        removed
    }
}
