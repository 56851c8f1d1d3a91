mod memory;

pub use memory::MemoryScene;
use glam::{DMat4, Vec3};
use serde::{Serialize, Deserialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

impl InstId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A mesh-backed instance: which mesh, and where.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshPlacement {
    pub mesh: MeshId,
    pub flags: u32,
    pub transform: DMat4,
}

/// A sprite-backed instance, including its animation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub world: WorldId,
    pub sprite: SpriteId,
    pub flags: u32,
    pub position: Vec3,
    pub yaw: f32,
    pub anim: i32,
    pub frame: i32,
    pub reps: [i32; 4],
}

/// Everything needed to rebuild an instance after it was deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InstanceParams {
    Mesh(MeshPlacement),
    Sprite(SpritePlacement),
}

/// Scene instances as the history engine sees them.
///
/// Instance handles are stable: a deleted instance can be brought back under
/// the same handle with `restore_instance`.
pub trait InstanceStore {
    fn create_instance(&mut self, params: &InstanceParams) -> InstId;
    fn restore_instance(&mut self, inst: InstId, params: &InstanceParams);
    /// Current reconstruction parameters of a live instance.
    fn instance_params(&self, inst: InstId) -> InstanceParams;
    fn delete_instance(&mut self, inst: InstId);
    /// The world a mesh lives in.
    fn mesh_world(&self, mesh: MeshId) -> WorldId;
    /// Rebuild state that depends on the instances of `world`.
    fn rebuild_world(&mut self, world: WorldId);
}
