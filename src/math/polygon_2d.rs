use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the polygon with counter-clockwise winding, reversing it if needed.
#[must_use]
pub fn counter_clockwise(points: &[Point2]) -> Vec<Point2> {
    if signed_area_2d(points) < 0.0 {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    }
}

/// Tests whether any two non-adjacent segments of a closed polygon intersect.
///
/// Adjacent segments share an endpoint by construction and are skipped,
/// including the wrap pair (last segment, first segment).
#[must_use]
pub fn has_self_intersection(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }

    for i in 0..n {
        for j in (i + 2)..n {
            // Skip the wrap-adjacent pair.
            if i == 0 && j == n - 1 {
                continue;
            }
            let a0 = &points[i];
            let a1 = &points[(i + 1) % n];
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
                return true;
            }
        }
    }
    false
}

/// Point-in-polygon test via ray crossing.
///
/// Points exactly on the boundary may classify either way; callers that
/// care about the boundary must test it separately.
#[must_use]
pub fn point_in_polygon(pt: &Point2, points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &points[i];
        let pj = &points[j];
        if (pi.y > pt.y) != (pj.y > pt.y) {
            let x_cross = pi.x + (pt.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
            if pt.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area_2d(&square());
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts: Vec<Point2> = square().into_iter().rev().collect();
        let area = signed_area_2d(&pts);
        assert!((area + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn counter_clockwise_keeps_ccw() {
        let pts = counter_clockwise(&square());
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
        assert!((pts[0].x).abs() < TOLERANCE);
    }

    #[test]
    fn counter_clockwise_reverses_cw() {
        let cw: Vec<Point2> = square().into_iter().rev().collect();
        let pts = counter_clockwise(&cw);
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn square_is_simple() {
        assert!(!has_self_intersection(&square()));
    }

    #[test]
    fn bowtie_self_intersects() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(has_self_intersection(&pts));
    }

    #[test]
    fn l_shape_is_simple() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(!has_self_intersection(&pts));
    }

    #[test]
    fn point_inside_square() {
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &square()));
    }

    #[test]
    fn point_outside_square() {
        assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &square()));
    }

    #[test]
    fn point_in_l_shape_notch() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        // The notch (upper right) is outside the L.
        assert!(!point_in_polygon(&Point2::new(3.0, 3.0), &pts));
        assert!(point_in_polygon(&Point2::new(1.0, 3.0), &pts));
        assert!(point_in_polygon(&Point2::new(3.0, 1.0), &pts));
    }
}
