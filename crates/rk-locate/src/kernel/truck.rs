//! Truck CAD Kernel Backend
//!
//! Pure Rust B-Rep kernel using the Truck library.
//!
//! Note: Truck has no fillet operation and no mass properties, so
//! `fillet` and `volume` report `OperationFailed`. Bounding boxes are the
//! hull of the B-Rep vertices, which is exact for planar solids only.

use glam::DVec3;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use truck_modeling::{Matrix4, Point3, Rad, Solid as TruckSolid, Vector3, builder};

use super::{
    BooleanType, BoundingBox, CadError, CadKernel, CadResult, EdgeId, EdgeInfo, Solid,
};
use crate::transform::AffineTransform;

/// Tolerance handed to truck-shapeops
const BOOLEAN_TOLERANCE: f64 = 0.05;

fn to_point(v: DVec3) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}

fn to_vector(v: DVec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

fn from_point(p: Point3) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

/// Truck-based CAD kernel
pub struct TruckKernel {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, TruckSolid>>,
}

impl TruckKernel {
    /// Create a new Truck kernel
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
        }
    }

    /// Store a solid and return a Solid reference
    fn store_solid(&self, solid: TruckSolid) -> Solid {
        let id = Uuid::new_v4();
        self.solids.lock().insert(id, solid);
        Solid::new(id).with_kernel_data()
    }

    /// Get a stored solid by ID
    fn get_solid(&self, solid: &Solid) -> CadResult<TruckSolid> {
        self.solids
            .lock()
            .get(&solid.id)
            .cloned()
            .ok_or(CadError::SolidNotFound(solid.id))
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for TruckKernel {
    fn name(&self) -> &str {
        "truck"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid> {
        if size.min_element() <= 0.0 {
            return Err(CadError::InvalidDimensions(format!(
                "Box size must be positive, got {:?}",
                size
            )));
        }

        let min = center - size * 0.5;
        let vertex = builder::vertex(to_point(min));
        let edge = builder::tsweep(&vertex, Vector3::new(size.x, 0.0, 0.0));
        let face = builder::tsweep(&edge, Vector3::new(0.0, size.y, 0.0));
        let solid = builder::tsweep(&face, Vector3::new(0.0, 0.0, size.z));

        Ok(self.store_solid(solid))
    }

    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
    ) -> CadResult<Solid> {
        if radius <= 0.0 || height <= 0.0 || axis.length() == 0.0 {
            return Err(CadError::InvalidDimensions(format!(
                "Cylinder needs positive radius, height and axis (r={}, h={}, axis={:?})",
                radius, height, axis
            )));
        }

        let axis = axis.normalize();
        let base = center - axis * (height * 0.5);
        let rim = base + axis.any_orthonormal_vector() * radius;

        // Sweep a rim vertex around the axis, cap it, then extrude
        let vertex = builder::vertex(to_point(rim));
        let circle = builder::rsweep(
            &vertex,
            to_point(base),
            to_vector(axis),
            Rad(std::f64::consts::TAU),
        );
        let face = builder::try_attach_plane(&[circle])
            .map_err(|e| CadError::OperationFailed(format!("Failed to create face: {:?}", e)))?;
        let solid = builder::tsweep(&face, to_vector(axis * height));

        Ok(self.store_solid(solid))
    }

    fn get_edges(&self, solid: &Solid) -> CadResult<Vec<EdgeInfo>> {
        let data = self.get_solid(solid)?;

        // Each edge is shared by two faces; keep the first occurrence
        let mut seen = HashSet::new();
        let edges = data
            .boundaries()
            .iter()
            .flat_map(|shell| shell.edge_iter())
            .filter(|edge| seen.insert(edge.id()))
            .enumerate()
            .map(|(i, edge)| {
                EdgeInfo::new(
                    EdgeId::new(solid.id, i as u32),
                    from_point(edge.front().point()),
                    from_point(edge.back().point()),
                )
            })
            .collect();

        Ok(edges)
    }

    fn fillet(&self, _solid: &Solid, _edges: &[EdgeId], _radius: f64) -> CadResult<Solid> {
        Err(CadError::OperationFailed(
            "Fillet is not supported in Truck kernel".into(),
        ))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let a_data = self.get_solid(a)?;
        let mut b_data = self.get_solid(b)?;

        let result = match op {
            BooleanType::Union => truck_shapeops::or(&a_data, &b_data, BOOLEAN_TOLERANCE),
            BooleanType::Intersect => truck_shapeops::and(&a_data, &b_data, BOOLEAN_TOLERANCE),
            BooleanType::Subtract => {
                b_data.not();
                truck_shapeops::and(&a_data, &b_data, BOOLEAN_TOLERANCE)
            }
        };

        result
            .map(|solid| self.store_solid(solid))
            .ok_or_else(|| CadError::BooleanFailed(format!("Truck {:?} failed", op)))
    }

    fn transform(&self, solid: &Solid, transform: &AffineTransform) -> CadResult<Solid> {
        let data = self.get_solid(solid)?;
        let matrix = Matrix4::from(transform.matrix().to_cols_array_2d());
        Ok(self.store_solid(builder::transformed(&data, matrix)))
    }

    fn bounding_box(&self, solid: &Solid) -> CadResult<BoundingBox> {
        let data = self.get_solid(solid)?;
        let bbox = BoundingBox::from_points(
            data.boundaries()
                .iter()
                .flat_map(|shell| shell.vertex_iter())
                .map(|vertex| from_point(vertex.point())),
        );

        if bbox.is_empty() {
            return Err(CadError::OperationFailed("Solid has no vertices".into()));
        }
        Ok(bbox)
    }

    fn volume(&self, _solid: &Solid) -> CadResult<f64> {
        Err(CadError::OperationFailed(
            "Volume is not supported in Truck kernel".into(),
        ))
    }

    fn release(&self, solid: &Solid) -> bool {
        self.solids.lock().remove(&solid.id).is_some()
    }
}
