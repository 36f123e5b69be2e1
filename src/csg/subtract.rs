use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::mesh::Mesh;

use super::heal::heal_t_junctions;
use super::node::Node;
use super::polygon::Polygon;

/// Welding quantum for result vertices.
///
/// Seam vertices computed independently on each side of a clip differ by
/// floating-point noise; keys quantized to this grid merge them.
const WELD_EPSILON: f64 = 1e-9;

/// Computes the boolean subtraction of one closed mesh from another.
///
/// Both operands are left untouched; the result is a freshly allocated
/// closed mesh bounding the volume of A with B's volume removed. For fixed
/// inputs the output is identical across runs.
pub struct Subtract<'a> {
    mesh_a: &'a Mesh,
    mesh_b: &'a Mesh,
}

impl<'a> Subtract<'a> {
    /// Creates a new `Subtract` operation (A - B).
    #[must_use]
    pub fn new(mesh_a: &'a Mesh, mesh_b: &'a Mesh) -> Self {
        Self { mesh_a, mesh_b }
    }

    /// Executes the subtraction.
    ///
    /// If B does not intersect A's bounding volume the result is an exact
    /// copy of A; if A is entirely inside B the result is the empty mesh.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if either operand is not a
    /// closed mesh or contains zero-area triangles.
    pub fn execute(&self) -> Result<Mesh> {
        if self.mesh_a.is_empty() {
            return Ok(Mesh::default());
        }
        if self.mesh_b.is_empty() {
            return Ok(self.mesh_a.clone());
        }
        if !self.mesh_a.is_closed() {
            return Err(
                GeometryError::Degenerate("subtraction operand A is not a closed mesh".into())
                    .into(),
            );
        }
        if !self.mesh_b.is_closed() {
            return Err(
                GeometryError::Degenerate("subtraction operand B is not a closed mesh".into())
                    .into(),
            );
        }

        // AABB early-out: disjoint operands leave A untouched.
        let (Some(aabb_a), Some(aabb_b)) = (self.mesh_a.aabb(), self.mesh_b.aabb()) else {
            return Ok(self.mesh_a.clone());
        };
        if !aabb_a.overlaps(&aabb_b) {
            return Ok(self.mesh_a.clone());
        }

        trace!(
            triangles_a = self.mesh_a.triangles.len(),
            triangles_b = self.mesh_b.triangles.len(),
            "bsp subtraction"
        );

        let mut a = Node::new(mesh_polygons(self.mesh_a)?);
        let mut b = Node::new(mesh_polygons(self.mesh_b)?);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        a.invert();

        let mut result = polygons_to_mesh(&a.all_polygons());
        heal_t_junctions(&mut result);
        Ok(result)
    }
}

/// Converts a triangle mesh into CSG polygons.
fn mesh_polygons(mesh: &Mesh) -> Result<Vec<Polygon>> {
    mesh.triangles
        .iter()
        .map(|tri| {
            Polygon::from_vertices(vec![
                mesh.vertices[tri[0] as usize],
                mesh.vertices[tri[1] as usize],
                mesh.vertices[tri[2] as usize],
            ])
        })
        .collect()
}

/// Assembles clipped polygons into an indexed mesh.
///
/// Convex polygons are fan-triangulated; vertices are welded on a
/// `WELD_EPSILON` grid so fragments split from the same seam share indices.
#[allow(clippy::cast_possible_truncation)]
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::default();
    let mut index_of: HashMap<(i64, i64, i64), u32> = HashMap::new();

    for polygon in polygons {
        let mut indices = Vec::with_capacity(polygon.vertices.len());
        for v in &polygon.vertices {
            let key = (quantize(v.x), quantize(v.y), quantize(v.z));
            let index = match index_of.entry(key) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let index = mesh.vertices.len() as u32;
                    mesh.vertices.push(*v);
                    *entry.insert(index)
                }
            };
            indices.push(index);
        }
        indices.dedup();
        if indices.len() > 1 && indices[0] == indices[indices.len() - 1] {
            indices.pop();
        }
        for i in 1..indices.len().saturating_sub(1) {
            let tri = [indices[0], indices[i], indices[i + 1]];
            if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                mesh.triangles.push(tri);
            }
        }
    }

    mesh
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(value: f64) -> i64 {
    (value / WELD_EPSILON).round() as i64
}
