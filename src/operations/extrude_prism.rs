use std::collections::HashMap;

use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{
    counter_clockwise, has_self_intersection, point_in_polygon, signed_area_2d,
};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};
use crate::mesh::Mesh;

/// Extrudes a simple closed footprint into a closed prism mesh.
///
/// The footprint lies in the world XZ plane at ground level, given as
/// `(x, z)` pairs; it may be non-convex but must not self-intersect. The
/// cap is triangulated with a constrained Delaunay triangulation, the far
/// cap mirrors it at `direction · depth`, and side quads connect the two.
/// The output satisfies the closed-manifold invariant and is the CSG
/// operand representing an obstacle's solid volume.
pub struct ExtrudePrism {
    footprint: Vec<Point2>,
    direction: Vector3,
    depth: f64,
}

impl ExtrudePrism {
    /// Creates a new `ExtrudePrism` operation.
    #[must_use]
    pub fn new(footprint: Vec<Point2>, direction: Vector3, depth: f64) -> Self {
        Self {
            footprint,
            direction,
            depth,
        }
    }

    /// Executes the extrusion, returning the prism mesh.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidPolygon`] if the footprint has fewer
    /// than three points, repeats a point, self-intersects, or encloses no
    /// area, or if the extrusion direction or depth is degenerate. No
    /// partial mesh is ever returned.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Mesh> {
        let n = self.footprint.len();
        if n < 3 {
            return Err(GeometryError::InvalidPolygon(format!(
                "footprint needs at least three points, got {n}"
            ))
            .into());
        }
        for i in 0..n {
            let a = self.footprint[i];
            let b = self.footprint[(i + 1) % n];
            if (a - b).norm() < TOLERANCE {
                return Err(
                    GeometryError::InvalidPolygon("footprint repeats a point".into()).into(),
                );
            }
        }
        if self.direction.norm() < TOLERANCE {
            return Err(
                GeometryError::InvalidPolygon("extrude direction must be non-zero".into()).into(),
            );
        }
        if self.direction.y.abs() < TOLERANCE {
            return Err(GeometryError::InvalidPolygon(
                "extrude direction is parallel to the footprint plane".into(),
            )
            .into());
        }
        if self.depth <= TOLERANCE {
            return Err(GeometryError::InvalidPolygon(format!(
                "extrusion depth must be positive, got {}",
                self.depth
            ))
            .into());
        }
        if signed_area_2d(&self.footprint).abs() < TOLERANCE {
            return Err(
                GeometryError::InvalidPolygon("footprint encloses no area".into()).into(),
            );
        }
        if has_self_intersection(&self.footprint) {
            return Err(
                GeometryError::InvalidPolygon("footprint self-intersects".into()).into(),
            );
        }

        let footprint = counter_clockwise(&self.footprint);
        let cap = triangulate_footprint(&footprint)?;

        let shift = self.direction.normalize() * self.depth;
        let mut vertices = Vec::with_capacity(2 * n);
        for p in &footprint {
            vertices.push(Point3::new(p.x, 0.0, p.y));
        }
        for p in &footprint {
            vertices.push(Point3::new(p.x, 0.0, p.y) + shift);
        }

        // A counter-clockwise (x, z) triangle has a -y normal, so the cap
        // winding that faces away from the extrusion flips with its sign.
        let downward = shift.y < 0.0;
        let n = n as u32;
        let mut triangles = Vec::with_capacity(cap.len() * 2 + 2 * n as usize);
        for tri in &cap {
            let near = [tri[2], tri[1], tri[0]];
            let far = [tri[0] + n, tri[1] + n, tri[2] + n];
            if downward {
                triangles.push(near);
                triangles.push(far);
            } else {
                triangles.push(*tri);
                triangles.push([far[2], far[1], far[0]]);
            }
        }
        for i in 0..n {
            let j = (i + 1) % n;
            let (near_i, near_j, far_i, far_j) = (i, j, i + n, j + n);
            if downward {
                triangles.push([near_i, near_j, far_j]);
                triangles.push([near_i, far_j, far_i]);
            } else {
                triangles.push([near_i, far_j, near_j]);
                triangles.push([near_i, far_i, far_j]);
            }
        }

        Ok(Mesh {
            vertices,
            triangles,
        })
    }
}

/// Triangulates a counter-clockwise simple polygon via CDT.
///
/// The boundary is inserted as constraint edges; triangles of the convex
/// hull that fall outside the polygon are filtered out by their centroid.
/// Returns index triples into the footprint, counter-clockwise in `(x, z)`.
#[allow(clippy::cast_possible_truncation)]
fn triangulate_footprint(footprint: &[Point2]) -> Result<Vec<[u32; 3]>> {
    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    let mut handles = Vec::with_capacity(footprint.len());
    for p in footprint {
        let handle = cdt.insert(SpadePoint2::new(p.x, p.y)).map_err(
            |e: InsertionError| GeometryError::InvalidPolygon(format!("triangulation insert: {e}")),
        )?;
        handles.push(handle);
    }
    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    let mut index_of: HashMap<usize, u32> = HashMap::new();
    for (i, handle) in handles.iter().enumerate() {
        index_of.insert(handle.index(), i as u32);
    }

    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        let verts = face.vertices();
        let centroid = Point2::new(
            (verts[0].position().x + verts[1].position().x + verts[2].position().x) / 3.0,
            (verts[0].position().y + verts[1].position().y + verts[2].position().y) / 3.0,
        );
        if !point_in_polygon(&centroid, footprint) {
            continue;
        }
        let mut tri = [0_u32; 3];
        for (k, vh) in verts.iter().enumerate() {
            let Some(&index) = index_of.get(&vh.fix().index()) else {
                return Err(GeometryError::InvalidPolygon(
                    "triangulation produced an unknown vertex".into(),
                )
                .into());
            };
            tri[k] = index;
        }
        triangles.push(tri);
    }

    if triangles.is_empty() {
        return Err(GeometryError::InvalidPolygon("footprint triangulation is empty".into()).into());
    }
    Ok(triangles)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64) -> Point2 {
        Point2::new(x, z)
    }

    fn down() -> Vector3 {
        -Vector3::y()
    }

    fn square() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    fn l_shape() -> Vec<Point2> {
        vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ]
    }

    #[test]
    fn square_prism_counts_and_volume() {
        let mesh = ExtrudePrism::new(square(), down(), 2.0).execute().unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        // 2 cap triangles per face + 8 side triangles.
        assert_eq!(mesh.triangles.len(), 12);
        assert!(mesh.is_closed());
        assert!((mesh.volume() - 2.0).abs() < 1e-9, "{}", mesh.volume());
    }

    #[test]
    fn triangle_prism_is_closed() {
        let footprint = vec![p(0.0, 0.0), p(3.0, 0.0), p(0.0, 3.0)];
        let mesh = ExtrudePrism::new(footprint, down(), 2.0).execute().unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangles.len(), 8);
        assert!(mesh.is_closed());
        assert!((mesh.volume() - 9.0).abs() < 1e-9, "{}", mesh.volume());
    }

    #[test]
    fn l_shape_prism_handles_reflex_vertex() {
        let mesh = ExtrudePrism::new(l_shape(), down(), 2.0).execute().unwrap();
        assert_eq!(mesh.vertices.len(), 12);
        // 4 cap triangles per face + 12 side triangles.
        assert_eq!(mesh.triangles.len(), 20);
        assert!(mesh.is_closed());
        // The L covers 12 of the 16 square units.
        assert!((mesh.volume() - 24.0).abs() < 1e-9, "{}", mesh.volume());
    }

    #[test]
    fn cap_triangles_avoid_the_notch() {
        let mesh = ExtrudePrism::new(l_shape(), down(), 2.0).execute().unwrap();
        for tri in &mesh.triangles {
            let a = mesh.vertices[tri[0] as usize];
            let b = mesh.vertices[tri[1] as usize];
            let c = mesh.vertices[tri[2] as usize];
            let cx = (a.x + b.x + c.x) / 3.0;
            let cz = (a.z + b.z + c.z) / 3.0;
            let in_notch = cx > 2.0 + 1e-9 && cz > 2.0 + 1e-9;
            assert!(!in_notch, "triangle centroid ({cx}, {cz}) is inside the notch");
        }
    }

    #[test]
    fn clockwise_footprint_is_normalized() {
        let cw: Vec<Point2> = square().into_iter().rev().collect();
        let mesh = ExtrudePrism::new(cw, down(), 2.0).execute().unwrap();
        assert!(mesh.is_closed());
        assert!((mesh.volume() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn upward_extrusion_is_closed() {
        let mesh = ExtrudePrism::new(square(), Vector3::y(), 1.5)
            .execute()
            .unwrap();
        assert!(mesh.is_closed());
        assert!((mesh.volume() - 1.5).abs() < 1e-9, "{}", mesh.volume());
        // Far cap sits above the footprint plane.
        assert!(mesh.vertices.iter().any(|v| (v.y - 1.5).abs() < 1e-9));
    }

    #[test]
    fn direction_magnitude_does_not_scale_depth() {
        let mesh = ExtrudePrism::new(square(), down() * 7.0, 2.0)
            .execute()
            .unwrap();
        assert!((mesh.volume() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn too_few_points_rejected() {
        let result = ExtrudePrism::new(vec![p(0.0, 0.0), p(1.0, 0.0)], down(), 2.0).execute();
        assert!(result.is_err());
    }

    #[test]
    fn self_intersecting_footprint_rejected() {
        let bowtie = vec![p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)];
        let result = ExtrudePrism::new(bowtie, down(), 2.0).execute();
        assert!(result.is_err());
    }

    #[test]
    fn repeated_point_rejected() {
        let footprint = vec![p(0.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let result = ExtrudePrism::new(footprint, down(), 2.0).execute();
        assert!(result.is_err());
    }

    #[test]
    fn zero_area_footprint_rejected() {
        let collinear = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        let result = ExtrudePrism::new(collinear, down(), 2.0).execute();
        assert!(result.is_err());
    }

    #[test]
    fn zero_direction_rejected() {
        let result = ExtrudePrism::new(square(), Vector3::zeros(), 2.0).execute();
        assert!(result.is_err());
    }

    #[test]
    fn horizontal_direction_rejected() {
        let result = ExtrudePrism::new(square(), Vector3::x(), 2.0).execute();
        assert!(result.is_err());
    }

    #[test]
    fn non_positive_depth_rejected() {
        let result = ExtrudePrism::new(square(), down(), 0.0).execute();
        assert!(result.is_err());
    }
}
