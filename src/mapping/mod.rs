use crate::map::MapPoint;
use crate::math::{Point3, Vector3};

/// Normalized mapping from map-local units to world units.
///
/// Derived once per loaded map and read-only afterwards. The longer map
/// dimension is normalized to exactly one overall-scale unit, so neither
/// dimension is ever stretched below unit scale, and the centering offset
/// puts the floor's center at the world origin on the horizontal plane.
#[derive(Debug, Clone, Copy)]
pub struct ScaleState {
    horizontal: f64,
    vertical: f64,
    overall: f64,
    offset: Vector3,
}

impl ScaleState {
    /// Derives the scale state from a map's width/height ratio.
    #[must_use]
    pub fn from_ratio(ratio: f64, overall_scale: f64) -> Self {
        let (horizontal, vertical) = if ratio >= 1.0 {
            (ratio, 1.0)
        } else {
            (1.0, 1.0 / ratio)
        };
        let offset = Vector3::new(
            -horizontal * overall_scale / 2.0,
            0.0,
            vertical * overall_scale / 2.0,
        );
        Self {
            horizontal,
            vertical,
            overall: overall_scale,
            offset,
        }
    }

    /// Horizontal scale factor.
    #[must_use]
    pub fn horizontal(&self) -> f64 {
        self.horizontal
    }

    /// Vertical scale factor.
    #[must_use]
    pub fn vertical(&self) -> f64 {
        self.vertical
    }

    /// The overall scale multiplying all conversions.
    #[must_use]
    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Maps a map-local point onto the world-space floor plane.
    ///
    /// Map-local y increases downward, so it maps to negative world depth.
    #[must_use]
    pub fn point_to_world(&self, p: MapPoint) -> Point3 {
        Point3::new(
            p.x * self.horizontal * self.overall,
            0.0,
            -p.y * self.vertical * self.overall,
        ) + self.offset
    }

    /// Converts a map-local length to a world-space length.
    ///
    /// Uses the larger of the two scale factors so radii and sizes scale
    /// uniformly regardless of map orientation.
    #[must_use]
    pub fn length_to_world(&self, len: f64) -> f64 {
        len * self.overall * self.horizontal.max(self.vertical)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn wide_map_scales_horizontal() {
        let scale = ScaleState::from_ratio(2.0, 10.0);
        assert!((scale.horizontal() - 2.0).abs() < TOLERANCE);
        assert!((scale.vertical() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn tall_map_scales_vertical() {
        let scale = ScaleState::from_ratio(0.5, 10.0);
        assert!((scale.horizontal() - 1.0).abs() < TOLERANCE);
        assert!((scale.vertical() - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn map_center_maps_to_origin() {
        let scale = ScaleState::from_ratio(1.0, 10.0);
        let world = scale.point_to_world(MapPoint::new(0.5, 0.5));
        assert!(world.x.abs() < TOLERANCE);
        assert!(world.y.abs() < TOLERANCE);
        assert!(world.z.abs() < TOLERANCE);
    }

    #[test]
    fn map_corners_span_scaled_extent() {
        let scale = ScaleState::from_ratio(2.0, 10.0);
        let top_left = scale.point_to_world(MapPoint::new(0.0, 0.0));
        let bottom_right = scale.point_to_world(MapPoint::new(1.0, 1.0));
        assert!((top_left.x + 10.0).abs() < TOLERANCE);
        assert!((top_left.z - 5.0).abs() < TOLERANCE);
        assert!((bottom_right.x - 10.0).abs() < TOLERANCE);
        assert!((bottom_right.z + 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn map_y_increases_toward_negative_depth() {
        let scale = ScaleState::from_ratio(1.0, 10.0);
        let near = scale.point_to_world(MapPoint::new(0.5, 0.2));
        let far = scale.point_to_world(MapPoint::new(0.5, 0.8));
        assert!(near.z > far.z);
    }

    #[test]
    fn length_uses_larger_scale_factor() {
        let wide = ScaleState::from_ratio(2.0, 10.0);
        let tall = ScaleState::from_ratio(0.5, 10.0);
        assert!((wide.length_to_world(1.0) - 20.0).abs() < TOLERANCE);
        assert!((tall.length_to_world(1.0) - 20.0).abs() < TOLERANCE);
        assert!((wide.length_to_world(0.25) - 5.0).abs() < TOLERANCE);
    }
}
