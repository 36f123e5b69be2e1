use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::mesh::Mesh;

/// Distance below which a vertex is considered to lie on a triangle edge.
///
/// Sits well above the vertex-welding quantum and well below any real
/// feature size, so only clipping seams match.
const EDGE_EPSILON: f64 = 1e-8;

/// Restores index-level edge pairing after BSP clipping.
///
/// Clipping subdivides a shared edge independently on each side of a seam,
/// leaving vertices of one side in the middle of the other side's edges.
/// This pass splits every triangle edge at each mesh vertex lying on it and
/// drops collapsed slivers, after which every interior edge is shared by
/// exactly two triangles again. Purely index/topology surgery: no vertex is
/// moved or added, so the enclosed volume is unchanged.
pub fn heal_t_junctions(mesh: &mut Mesh) {
    let vertices = std::mem::take(&mut mesh.vertices);
    let mut queue: VecDeque<[u32; 3]> = mesh.triangles.drain(..).collect();
    let mut healed: Vec<[u32; 3]> = Vec::with_capacity(queue.len());

    'triangles: while let Some(tri) = queue.pop_front() {
        if is_sliver(&vertices, tri) {
            continue;
        }

        for e in 0..3 {
            let u = tri[e];
            let v = tri[(e + 1) % 3];
            let w = tri[(e + 2) % 3];
            let mut on_edge = collinear_interior_vertices(&vertices, u, v, w);
            if on_edge.is_empty() {
                continue;
            }
            on_edge.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            // Fan the subdivided edge from the opposite vertex.
            let mut prev = u;
            for &(_, mid) in &on_edge {
                queue.push_back([prev, mid, w]);
                prev = mid;
            }
            queue.push_back([prev, v, w]);
            continue 'triangles;
        }

        healed.push(tri);
    }

    mesh.vertices = vertices;
    mesh.triangles = healed;
}

/// Whether the triangle has (near-)collinear vertices.
fn is_sliver(vertices: &[crate::math::Point3], tri: [u32; 3]) -> bool {
    let pu = vertices[tri[0] as usize];
    let pv = vertices[tri[1] as usize];
    let pw = vertices[tri[2] as usize];
    let edge = pv - pu;
    let len = edge.norm();
    if len < EDGE_EPSILON {
        return true;
    }
    let height = edge.cross(&(pw - pu)).norm() / len;
    height < EDGE_EPSILON
}

/// Finds vertices lying strictly between `u` and `v`, excluding the
/// triangle's own corners, as `(parameter, index)` pairs.
#[allow(clippy::cast_possible_truncation)]
fn collinear_interior_vertices(
    vertices: &[crate::math::Point3],
    u: u32,
    v: u32,
    w: u32,
) -> Vec<(f64, u32)> {
    let pu = vertices[u as usize];
    let pv = vertices[v as usize];
    let edge = pv - pu;
    let len_sq = edge.norm_squared();
    let len = len_sq.sqrt();

    let mut found = Vec::new();
    for (index, p) in vertices.iter().enumerate() {
        let index = index as u32;
        if index == u || index == v || index == w {
            continue;
        }
        let t = (p - pu).dot(&edge) / len_sq;
        if t <= 0.0 || t >= 1.0 {
            continue;
        }
        let along = t * len;
        if along < EDGE_EPSILON || len - along < EDGE_EPSILON {
            continue;
        }
        let closest = pu + edge * t;
        if (p - closest).norm() < EDGE_EPSILON {
            found.push((t, index));
        }
    }
    found
}
