use std::collections::HashMap;

use crate::math::{Point3, Vector3, TOLERANCE};

/// An indexed triangle mesh.
///
/// Vertices and triangles are ordered; each triangle is a triple of indices
/// into the vertex list. Builders never mutate a mesh after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// An axis-aligned box centered at `center` with the given half extents.
    ///
    /// All 12 triangles wind outward.
    #[must_use]
    pub fn cuboid(center: Point3, half_extents: Vector3) -> Self {
        let h = half_extents;
        let vertices = vec![
            center + Vector3::new(-h.x, -h.y, -h.z),
            center + Vector3::new(h.x, -h.y, -h.z),
            center + Vector3::new(h.x, h.y, -h.z),
            center + Vector3::new(-h.x, h.y, -h.z),
            center + Vector3::new(-h.x, -h.y, h.z),
            center + Vector3::new(h.x, -h.y, h.z),
            center + Vector3::new(h.x, h.y, h.z),
            center + Vector3::new(-h.x, h.y, h.z),
        ];
        let triangles = vec![
            [0, 3, 2],
            [0, 2, 1],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self {
            vertices,
            triangles,
        }
    }

    /// Checks the closed-manifold invariant by index-level edge pairing:
    /// every directed edge must occur exactly once, paired with its reverse.
    ///
    /// Required of every CSG operand; holds for boxes, extruded prisms, and
    /// healed boolean results. Open ribbons fail it.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.triangles {
            let [a, b, c] = *tri;
            if a == b || b == c || a == c {
                return false;
            }
            for (start, end) in [(a, b), (b, c), (c, a)] {
                *directed.entry((start, end)).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(start, end), &count)| count == 1 && directed.get(&(end, start)) == Some(&1))
    }

    /// Signed enclosed volume via the tetrahedron method.
    ///
    /// Sums `v0 · (v1 × v2) / 6` over all triangles; positive when the
    /// triangles wind outward.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let mut signed = 0.0;
        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize].coords;
            let v1 = self.vertices[tri[1] as usize].coords;
            let v2 = self.vertices[tri[2] as usize].coords;
            signed += v0.dot(&v1.cross(&v2));
        }
        signed / 6.0
    }

    /// Axis-aligned bounding box, or `None` for a mesh with no vertices.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        Some(Aabb { min, max })
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Checks if two AABBs overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x + TOLERANCE
            && self.max.x >= other.min.x - TOLERANCE
            && self.min.y <= other.max.y + TOLERANCE
            && self.max.y >= other.min.y - TOLERANCE
            && self.min.z <= other.max.z + TOLERANCE
            && self.max.z >= other.min.z - TOLERANCE
    }
}
