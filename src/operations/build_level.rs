use tracing::debug;

use crate::csg::Subtract;
use crate::error::Result;
use crate::level::{LevelGeometry, LevelStore, SpawnPlacement, WallPlacement};
use crate::map::{LineColor, MapModel};
use crate::mapping::ScaleState;
use crate::math::{Point2, Point3, Vector3};
use crate::mesh::Mesh;

use super::extrude_prism::ExtrudePrism;
use super::wall_ribbon::WallRibbon;

/// Fixed extents and scales for level generation.
///
/// `overall_scale` multiplies every map-to-world conversion uniformly; the
/// remaining fields are world-space sizes.
#[derive(Debug, Clone, Copy)]
pub struct LevelParams {
    /// Uniform multiplier for all coordinate conversions.
    pub overall_scale: f64,
    /// Height of wall ribbons.
    pub wall_height: f64,
    /// Thickness of the floor slab; its top face sits at ground level.
    pub floor_thickness: f64,
    /// How far obstacle footprints are sunk below ground level.
    pub obstacle_depth: f64,
    /// Vertical lift of the spawn position above ground level.
    pub spawn_lift: f64,
    /// Vertical lift of wall outline polylines.
    pub outline_lift: f64,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            overall_scale: 10.0,
            wall_height: 1.0,
            floor_thickness: 0.5,
            obstacle_depth: 2.0,
            spawn_lift: 0.5,
            outline_lift: 0.5,
        }
    }
}

/// Builds the complete geometry of one level from a map model.
///
/// Runs the full pipeline in strict sequence: scale derivation, spawn
/// placement, floor slab, obstacle carving (a left fold of boolean
/// subtractions in map declaration order), wall ribbons, goal markers.
/// Generation is all-or-nothing: on any error the caller's store is left
/// untouched and no placement data is returned.
pub struct BuildLevel<'a> {
    map: &'a MapModel,
    params: LevelParams,
}

impl<'a> BuildLevel<'a> {
    /// Creates a new `BuildLevel` operation with default parameters.
    #[must_use]
    pub fn new(map: &'a MapModel) -> Self {
        Self {
            map,
            params: LevelParams::default(),
        }
    }

    /// Sets custom level parameters.
    #[must_use]
    pub fn with_params(mut self, params: LevelParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the pipeline, committing meshes to `store` only on success.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::MapError::MissingSpawn`] if the map has no
    /// spawn line; any other map or geometry failure is propagated
    /// unmodified from the component that detected it.
    pub fn execute(&self, store: &mut LevelStore) -> Result<LevelGeometry> {
        let scale = ScaleState::from_ratio(self.map.ratio(), self.params.overall_scale);

        debug!(
            ratio = self.map.ratio(),
            lines = self.map.lines().len(),
            "generating level geometry"
        );

        // The spawn line is resolved first: its absence aborts generation
        // before any mesh is built.
        let spawn_line = self.map.spawn_line()?;
        let average = spawn_line.average_point();
        let position = scale.point_to_world(average) + Vector3::y() * self.params.spawn_lift;
        let player_scale = 2.0 * scale.length_to_world(spawn_line.rms_distance_from(average));
        let spawn = SpawnPlacement {
            position,
            player_scale,
        };

        // Floor slab spanning the full scaled extent, top face at y = 0.
        let half_extents = Vector3::new(
            scale.horizontal() * scale.overall() / 2.0,
            self.params.floor_thickness / 2.0,
            scale.vertical() * scale.overall() / 2.0,
        );
        let mut floor = Mesh::cuboid(
            Point3::new(0.0, -self.params.floor_thickness / 2.0, 0.0),
            half_extents,
        );

        for line in self.map.lines_with_color(LineColor::Obstacle) {
            let footprint: Vec<Point2> = line
                .points()
                .iter()
                .map(|p| {
                    let world = scale.point_to_world(*p);
                    Point2::new(world.x, world.z)
                })
                .collect();
            let prism =
                ExtrudePrism::new(footprint, -Vector3::y(), self.params.obstacle_depth).execute()?;
            floor = Subtract::new(&floor, &prism).execute()?;
        }
        debug!(triangles = floor.triangles.len(), "floor carving complete");

        // Walls and goals are staged before anything touches the store, so
        // a failure here still commits nothing.
        let mut staged_walls = Vec::new();
        for line in self.map.lines_with_color(LineColor::Wall) {
            let mesh = WallRibbon::new(line, self.params.wall_height, Vector3::zeros())
                .execute(&scale)?;
            let outline: Vec<Point3> = line
                .points()
                .iter()
                .map(|p| scale.point_to_world(*p) + Vector3::y() * self.params.outline_lift)
                .collect();
            staged_walls.push((mesh, line.color(), outline, line.is_loop()));
        }

        let goals: Vec<Point3> = self
            .map
            .lines_with_color(LineColor::Goal)
            .map(|line| scale.point_to_world(line.average_point()))
            .collect();

        debug!(
            walls = staged_walls.len(),
            goals = goals.len(),
            "level geometry complete"
        );

        let floor = store.add_mesh(floor);
        let walls = staged_walls
            .into_iter()
            .map(|(mesh, color, outline, looped)| WallPlacement {
                mesh: store.add_mesh(mesh),
                color,
                outline,
                looped,
            })
            .collect();

        Ok(LevelGeometry {
            floor,
            walls,
            spawn,
            goals,
        })
    }
}
