use std::collections::HashMap;
use super::{InstId, InstanceParams, InstanceStore, MeshId, WorldId};

/// In-memory instance storage. Every mesh belongs to the world it was
/// registered with; unregistered meshes fall back to the default world.
#[derive(Default)]
pub struct MemoryScene {
    instances: Vec<Option<InstanceParams>>,
    mesh_worlds: HashMap<MeshId, WorldId>,
    rebuilds: HashMap<WorldId, u32>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_mesh(&mut self, mesh: MeshId, world: WorldId) {
        self.mesh_worlds.insert(mesh, world);
    }

    pub fn is_live(&self, inst: InstId) -> bool {
        matches!(self.instances.get(inst.index()), Some(Some(_)))
    }

    pub fn live_count(&self) -> usize {
        self.instances.iter().filter(|i| i.is_some()).count()
    }

    /// Mutable access for editing code that moves or re-animates an instance.
    pub fn params_mut(&mut self, inst: InstId) -> &mut InstanceParams {
        self.instances[inst.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("instance {inst:?} is not live"))
    }

    /// How many rebuild notifications `world` has received.
    pub fn rebuild_count(&self, world: WorldId) -> u32 {
        self.rebuilds.get(&world).copied().unwrap_or(0)
    }
}

impl InstanceStore for MemoryScene {
    fn create_instance(&mut self, params: &InstanceParams) -> InstId {
        let inst = InstId(self.instances.len() as u32);
        self.instances.push(Some(params.clone()));
        inst
    }

    fn restore_instance(&mut self, inst: InstId, params: &InstanceParams) {
        let slot = &mut self.instances[inst.index()];
        assert!(slot.is_none(), "instance {inst:?} is already live");
        *slot = Some(params.clone());
    }

    fn instance_params(&self, inst: InstId) -> InstanceParams {
        self.instances[inst.index()]
            .clone()
            .unwrap_or_else(|| panic!("instance {inst:?} is not live"))
    }

    fn delete_instance(&mut self, inst: InstId) {
        let removed = self.instances[inst.index()].take();
        assert!(removed.is_some(), "instance {inst:?} is not live");
    }

    fn mesh_world(&self, mesh: MeshId) -> WorldId {
        self.mesh_worlds.get(&mesh).copied().unwrap_or(WorldId(0))
    }

    fn rebuild_world(&mut self, world: WorldId) {
        *self.rebuilds.entry(world).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use glam::{DMat4, DVec3, Vec3};
    use super::*;
    use crate::scene::{MeshPlacement, SpriteId, SpritePlacement};

    fn sprite() -> InstanceParams {
        InstanceParams::Sprite(SpritePlacement {
            world: WorldId(3),
            sprite: SpriteId(9),
            flags: 1,
            position: Vec3::new(1.0, 2.0, 3.0),
            yaw: 90.0,
            anim: 2,
            frame: 4,
            reps: [1, 2, 3, 4],
        })
    }

    #[test]
    fn delete_and_restore_keeps_handle() {
        let mut scene = MemoryScene::new();
        let inst = scene.create_instance(&sprite());
        scene.delete_instance(inst);
        assert!(!scene.is_live(inst));
        scene.restore_instance(inst, &sprite());
        assert!(scene.is_live(inst));
        assert_eq!(scene.instance_params(inst), sprite());
        assert_eq!(scene.live_count(), 1);
    }

    #[test]
    fn mesh_world_uses_registration() {
        let mut scene = MemoryScene::new();
        scene.register_mesh(MeshId(1), WorldId(5));
        assert_eq!(scene.mesh_world(MeshId(1)), WorldId(5));
        assert_eq!(scene.mesh_world(MeshId(2)), WorldId(0));

        let placement = InstanceParams::Mesh(MeshPlacement {
            mesh: MeshId(1),
            flags: 0,
            transform: DMat4::from_translation(DVec3::new(4.0, 0.0, 0.0)),
        });
        let inst = scene.create_instance(&placement);
        assert_eq!(scene.instance_params(inst), placement);
    }

    #[test]
    #[should_panic(expected = "not live")]
    fn deleting_twice_panics() {
        let mut scene = MemoryScene::new();
        let inst = scene.create_instance(&sprite());
        scene.delete_instance(inst);
        scene.delete_instance(inst);
    }
}
