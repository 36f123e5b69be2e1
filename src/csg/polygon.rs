use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::plane::Plane;

/// A convex polygon with its supporting plane.
///
/// Inputs to the CSG engine are triangles; clipping preserves convexity,
/// so every polygon in a BSP tree stays convex.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub vertices: Vec<Point3>,
    pub plane: Plane,
}

impl Polygon {
    /// Creates a polygon, deriving its plane from the vertex loop.
    ///
    /// The normal is computed with Newell's method, which tolerates nearly
    /// collinear leading vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the loop has fewer than
    /// three vertices or encloses no area.
    pub fn from_vertices(vertices: Vec<Point3>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::Degenerate(
                "polygon needs at least three vertices".into(),
            )
            .into());
        }
        let normal = newell_normal(&vertices)?;
        let w = normal.dot(&vertices[0].coords);
        Ok(Self {
            vertices,
            plane: Plane::new(normal, w),
        })
    }

    /// Creates a polygon fragment that inherits an already-known plane.
    #[must_use]
    pub fn with_plane(vertices: Vec<Point3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    /// Reverses the polygon's orientation: vertex order and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

/// Computes the unit normal of a polygon using Newell's method.
fn newell_normal(points: &[Point3]) -> Result<Vector3> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate("zero-area polygon".into()).into());
    }
    Ok(normal / len)
}
