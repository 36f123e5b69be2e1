use crate::error::{MapError, Result};
use crate::math::TOLERANCE;

/// A 2D coordinate in map-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    /// Creates a new map point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Semantic role of a map line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColor {
    Spawn,
    Wall,
    Obstacle,
    Goal,
}

/// An ordered polyline with a color tag and loop flag.
///
/// When `looped` is true the last point implicitly connects back to the
/// first; the sequence must not duplicate the closing point.
#[derive(Debug, Clone)]
pub struct MapLine {
    points: Vec<MapPoint>,
    color: LineColor,
    looped: bool,
}

impl MapLine {
    /// Creates a line, validating the point sequence.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidData`] if the line has no points, or if a
    /// looping line explicitly repeats its first point at the end.
    pub fn new(points: Vec<MapPoint>, color: LineColor, looped: bool) -> Result<Self> {
        if points.is_empty() {
            return Err(MapError::InvalidData("line has no points".into()).into());
        }
        if looped && points.len() >= 2 {
            let first = points[0];
            let last = points[points.len() - 1];
            if (first.x - last.x).abs() < TOLERANCE && (first.y - last.y).abs() < TOLERANCE {
                return Err(MapError::InvalidData(
                    "looping line duplicates its closing point".into(),
                )
                .into());
            }
        }
        Ok(Self {
            points,
            color,
            looped,
        })
    }

    /// The ordered points of the line.
    #[must_use]
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    /// The line's color tag.
    #[must_use]
    pub fn color(&self) -> LineColor {
        self.color
    }

    /// Whether the last point connects back to the first.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.looped
    }

    /// Arithmetic mean of the line's points.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_point(&self) -> MapPoint {
        let inv_n = 1.0 / self.points.len() as f64;
        MapPoint::new(
            self.points.iter().map(|p| p.x).sum::<f64>() * inv_n,
            self.points.iter().map(|p| p.y).sum::<f64>() * inv_n,
        )
    }

    /// Root-mean-square distance of the line's points from `from`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rms_distance_from(&self, from: MapPoint) -> f64 {
        let inv_n = 1.0 / self.points.len() as f64;
        let mean_sq = self
            .points
            .iter()
            .map(|p| {
                let dx = p.x - from.x;
                let dy = p.y - from.y;
                dx * dx + dy * dy
            })
            .sum::<f64>()
            * inv_n;
        mean_sq.sqrt()
    }
}

/// Immutable description of a level: an aspect ratio and its colored lines.
#[derive(Debug, Clone)]
pub struct MapModel {
    ratio: f64,
    lines: Vec<MapLine>,
}

impl MapModel {
    /// Creates a map model, validating its fields.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidData`] if the ratio is not a positive
    /// finite number, the map has no lines, or more than one line carries
    /// the spawn color. A map with *no* spawn line is valid here; that
    /// condition is only fatal at generation time.
    pub fn new(ratio: f64, lines: Vec<MapLine>) -> Result<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(MapError::InvalidData(format!(
                "map aspect ratio must be positive, got {ratio}"
            ))
            .into());
        }
        if lines.is_empty() {
            return Err(MapError::InvalidData("map has no lines".into()).into());
        }
        let spawn_count = lines
            .iter()
            .filter(|l| l.color() == LineColor::Spawn)
            .count();
        if spawn_count > 1 {
            return Err(MapError::InvalidData(format!(
                "map has {spawn_count} spawn lines, expected at most one"
            ))
            .into());
        }
        Ok(Self { ratio, lines })
    }

    /// Width/height aspect ratio of the map.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// All lines in declaration order.
    #[must_use]
    pub fn lines(&self) -> &[MapLine] {
        &self.lines
    }

    /// Lines carrying the given color, in declaration order.
    pub fn lines_with_color(&self, color: LineColor) -> impl Iterator<Item = &MapLine> {
        self.lines.iter().filter(move |l| l.color() == color)
    }

    /// The unique spawn line.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingSpawn`] if no line carries the spawn color.
    pub fn spawn_line(&self) -> Result<&MapLine> {
        self.lines_with_color(LineColor::Spawn)
            .next()
            .ok_or_else(|| MapError::MissingSpawn.into())
    }
}
