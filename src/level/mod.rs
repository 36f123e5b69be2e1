use slotmap::SlotMap;

use crate::map::LineColor;
use crate::math::Point3;
use crate::mesh::Mesh;

slotmap::new_key_type! {
    /// Identifier for a mesh owned by a [`LevelStore`].
    pub struct MeshId;
}

/// Arena that owns the meshes of one generated level.
///
/// The store is an explicit value owned by the caller: loading a level
/// populates it, unloading is dropping it. Meshes are referenced by typed
/// generational IDs, so scene collaborators can hold handles without
/// borrowing the store.
#[derive(Debug, Default)]
pub struct LevelStore {
    meshes: SlotMap<MeshId, Mesh>,
}

impl LevelStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mesh and returns its ID.
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.insert(mesh)
    }

    /// Returns a reference to a mesh, or `None` for a stale ID.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    /// Removes a mesh from the store, transferring ownership to the caller.
    pub fn remove_mesh(&mut self, id: MeshId) -> Option<Mesh> {
        self.meshes.remove(id)
    }

    /// Number of meshes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the store holds no meshes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

/// Spawn data handed to the scene collaborator.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlacement {
    /// World position of the player spawn.
    pub position: Point3,
    /// Uniform scale for the player character.
    pub player_scale: f64,
}

/// One wall mesh with its render data.
#[derive(Debug, Clone)]
pub struct WallPlacement {
    /// The ribbon mesh in the level store.
    pub mesh: MeshId,
    /// Render color tag of the source line.
    pub color: LineColor,
    /// Elevated outline polyline for the line renderer.
    pub outline: Vec<Point3>,
    /// Whether the outline closes back on itself.
    pub looped: bool,
}

/// Placement summary of one generated level.
#[derive(Debug)]
pub struct LevelGeometry {
    /// The carved floor solid.
    pub floor: MeshId,
    /// Wall ribbons in map declaration order.
    pub walls: Vec<WallPlacement>,
    /// Player spawn data.
    pub spawn: SpawnPlacement,
    /// World positions for goal markers, in map declaration order.
    pub goals: Vec<Point3>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn store_round_trip() {
        let mut store = LevelStore::new();
        assert!(store.is_empty());
        let id = store.add_mesh(Mesh::cuboid(Point3::origin(), Vector3::new(1.0, 1.0, 1.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.mesh(id).unwrap().triangles.len(), 12);
    }

    #[test]
    fn removed_mesh_id_goes_stale() {
        let mut store = LevelStore::new();
        let id = store.add_mesh(Mesh::default());
        let mesh = store.remove_mesh(id).unwrap();
        assert!(mesh.is_empty());
        assert!(store.mesh(id).is_none());
        assert!(store.is_empty());
    }
}
