use crate::error::{MapError, Result};
use crate::map::MapLine;
use crate::mapping::ScaleState;
use crate::math::Vector3;
use crate::mesh::Mesh;

/// Triangulates a polyline into a double-sided vertical ribbon mesh.
///
/// Each point yields a floor vertex and a ceiling vertex `height` above it;
/// each segment yields two front triangles and the same two reversed, so
/// the ribbon is visible from both sides regardless of which face the
/// renderer culls. The result is an open surface and is never a valid CSG
/// operand.
pub struct WallRibbon<'a> {
    line: &'a MapLine,
    height: f64,
    offset: Vector3,
}

impl<'a> WallRibbon<'a> {
    /// Creates a new `WallRibbon` operation.
    #[must_use]
    pub fn new(line: &'a MapLine, height: f64, offset: Vector3) -> Self {
        Self {
            line,
            height,
            offset,
        }
    }

    /// Executes the operation, returning the ribbon mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidData`] if the line has fewer than two
    /// points or the height is not positive.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, scale: &ScaleState) -> Result<Mesh> {
        let points = self.line.points();
        let n = points.len();
        if n < 2 {
            return Err(MapError::InvalidData("wall line needs at least two points".into()).into());
        }
        if self.height <= 0.0 {
            return Err(MapError::InvalidData(format!(
                "wall height must be positive, got {}",
                self.height
            ))
            .into());
        }

        let lift = Vector3::new(0.0, self.height, 0.0);
        let mut vertices = Vec::with_capacity(2 * n);
        for p in points {
            let floor = scale.point_to_world(*p) + self.offset;
            vertices.push(floor);
            vertices.push(floor + lift);
        }

        // An open line must not wrap its final segment back to the start;
        // the modulo below only ever wraps for looping lines.
        let segments = if self.line.is_loop() { n } else { n - 1 };
        let mut triangles = Vec::with_capacity(segments * 4);
        for s in 0..segments {
            let low0 = (2 * s) as u32;
            let high0 = low0 + 1;
            let low1 = (2 * ((s + 1) % n)) as u32;
            let high1 = low1 + 1;
            triangles.push([low0, high0, low1]);
            triangles.push([low1, high0, high1]);
            triangles.push([low1, high0, low0]);
            triangles.push([high1, high0, low1]);
        }

        Ok(Mesh {
            vertices,
            triangles,
        })
    }
}
