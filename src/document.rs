use crate::scene::{InstanceStore, MemoryScene};
use crate::terrain::{MemoryTerrain, TerrainStore};

/// The collaborators history commands act on.
pub trait EditHost {
    fn terrain(&mut self) -> &mut dyn TerrainStore;
    fn scene(&mut self) -> &mut dyn InstanceStore;
}

/// An editable document backed by the in-memory stores.
#[derive(Default)]
pub struct Document {
    pub terrain: MemoryTerrain,
    pub scene: MemoryScene,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditHost for Document {
    fn terrain(&mut self) -> &mut dyn TerrainStore {
        &mut self.terrain
    }

    fn scene(&mut self) -> &mut dyn InstanceStore {
        &mut self.scene
    }
}
