use crate::math::{Point3, Vector3};

use super::polygon::Polygon;

/// Classification epsilon for points against splitting planes.
///
/// Deliberately coarser than the global comparison tolerance: points this
/// close to a plane are treated as lying on it, which keeps coplanar
/// classification consistent and recursion finite.
pub const PLANE_EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// An oriented plane in Hessian normal form: `normal · p = w`.
#[derive(Debug, Clone)]
pub struct Plane {
    pub normal: Vector3,
    pub w: f64,
}

impl Plane {
    /// Creates a plane from a unit normal and offset.
    #[must_use]
    pub fn new(normal: Vector3, w: f64) -> Self {
        Self { normal, w }
    }

    /// Reverses the plane's orientation.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of a point from the plane.
    #[must_use]
    pub fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }

    /// Splits `polygon` by this plane into the four output sets.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending
    /// on whether their normal agrees with this plane's; polygons entirely on
    /// one side go to `front` or `back`; spanning polygons are clipped into
    /// one piece for each side. Clipped fragments keep the source polygon's
    /// plane.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let mut polygon_type = COPLANAR;
        let mut types = Vec::with_capacity(polygon.vertices.len());
        for v in &polygon.vertices {
            let t = self.distance(v);
            let vertex_type = if t < -PLANE_EPSILON {
                BACK
            } else if t > PLANE_EPSILON {
                FRONT
            } else {
                COPLANAR
            };
            polygon_type |= vertex_type;
            types.push(vertex_type);
        }

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut front_verts: Vec<Point3> = Vec::with_capacity(n + 1);
                let mut back_verts: Vec<Point3> = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let ti = types[i];
                    let tj = types[j];
                    let vi = polygon.vertices[i];
                    let vj = polygon.vertices[j];
                    if ti != BACK {
                        front_verts.push(vi);
                    }
                    if ti != FRONT {
                        back_verts.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let edge = vj - vi;
                        let t = (self.w - self.normal.dot(&vi.coords)) / self.normal.dot(&edge);
                        let v = vi + edge * t;
                        front_verts.push(v);
                        back_verts.push(v);
                    }
                }
                if front_verts.len() >= 3 {
                    front.push(Polygon::with_plane(front_verts, polygon.plane.clone()));
                }
                if back_verts.len() >= 3 {
                    back.push(Polygon::with_plane(back_verts, polygon.plane.clone()));
                }
            }
        }
    }
}
