use std::collections::HashMap;
use super::{Detached, HeightMap, PatchId, TerrainId, TerrainStore, VisualMap, HEIGHT_CELLS, VISUAL_CELLS};

struct PatchData {
    height: HeightMap,
    visual: VisualMap,
    diag: u16,
    /// None while detached.
    location: Option<(TerrainId, i32, i32)>,
    height_updates: u32,
    visual_updates: u32,
}

const PATCH_BYTES: usize = std::mem::size_of::<PatchData>();

/// In-memory patch storage keyed by terrain and patch cell.
#[derive(Default)]
pub struct MemoryTerrain {
    patches: Vec<Option<PatchData>>,
    cells: HashMap<(TerrainId, i32, i32), PatchId>,
}

impl MemoryTerrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patch_at(&self, terrain: TerrainId, x: i32, y: i32) -> Option<PatchId> {
        self.cells.get(&(terrain, x, y)).copied()
    }

    /// Alive means attached or detached-but-retained.
    pub fn is_alive(&self, patch: PatchId) -> bool {
        matches!(self.patches.get(patch.index()), Some(Some(_)))
    }

    pub fn is_attached(&self, patch: PatchId) -> bool {
        self.patches
            .get(patch.index())
            .and_then(|p| p.as_ref())
            .is_some_and(|p| p.location.is_some())
    }

    pub fn attached_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of times the height grid was reported replaced.
    pub fn height_updates(&self, patch: PatchId) -> u32 {
        self.patch(patch).height_updates
    }

    pub fn visual_updates(&self, patch: PatchId) -> u32 {
        self.patch(patch).visual_updates
    }

    /// Cost of one patch, as reported on detach/attach/dispose.
    pub fn patch_bytes() -> usize {
        PATCH_BYTES
    }

    fn patch(&self, patch: PatchId) -> &PatchData {
        self.patches[patch.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("patch {patch:?} was disposed"))
    }

    fn patch_mut(&mut self, patch: PatchId) -> &mut PatchData {
        self.patches[patch.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("patch {patch:?} was disposed"))
    }

    fn occupy(&mut self, terrain: TerrainId, x: i32, y: i32, patch: PatchId) {
        let previous = self.cells.insert((terrain, x, y), patch);
        assert!(previous.is_none(), "cell ({x}, {y}) of {terrain:?} is already occupied");
    }
}

impl TerrainStore for MemoryTerrain {
    fn add_patch(&mut self, terrain: TerrainId, x: i32, y: i32, z: u16) -> PatchId {
        let patch = PatchId(self.patches.len() as u32);
        self.occupy(terrain, x, y, patch);
        self.patches.push(Some(PatchData {
            height: [[z; HEIGHT_CELLS + 1]; HEIGHT_CELLS + 1],
            visual: [[0; VISUAL_CELLS]; VISUAL_CELLS],
            diag: 0,
            location: Some((terrain, x, y)),
            height_updates: 0,
            visual_updates: 0,
        }));
        patch
    }

    fn detach_patch(&mut self, terrain: TerrainId, patch: PatchId) -> Detached {
        let Some((owner, x, y)) = self.patch_mut(patch).location.take() else {
            panic!("patch {patch:?} is not attached");
        };
        assert_eq!(owner, terrain, "patch {patch:?} belongs to {owner:?}");
        self.cells.remove(&(terrain, x, y));
        Detached { x, y, bytes: PATCH_BYTES }
    }

    fn attach_patch(&mut self, terrain: TerrainId, patch: PatchId, x: i32, y: i32) -> usize {
        assert!(self.patch(patch).location.is_none(), "patch {patch:?} is already attached");
        self.occupy(terrain, x, y, patch);
        self.patch_mut(patch).location = Some((terrain, x, y));
        PATCH_BYTES
    }

    fn dispose_patch(&mut self, patch: PatchId) -> usize {
        assert!(!self.is_attached(patch), "cannot dispose attached patch {patch:?}");
        match self.patches.get_mut(patch.index()).and_then(Option::take) {
            Some(_) => PATCH_BYTES,
            None => panic!("patch {patch:?} was already disposed"),
        }
    }

    fn height_map(&self, patch: PatchId) -> &HeightMap {
        &self.patch(patch).height
    }

    fn height_map_mut(&mut self, patch: PatchId) -> &mut HeightMap {
        &mut self.patch_mut(patch).height
    }

    fn height_map_updated(&mut self, patch: PatchId) {
        self.patch_mut(patch).height_updates += 1;
    }

    fn visual_map(&self, patch: PatchId) -> &VisualMap {
        &self.patch(patch).visual
    }

    fn visual_map_mut(&mut self, patch: PatchId) -> &mut VisualMap {
        &mut self.patch_mut(patch).visual
    }

    fn visual_map_updated(&mut self, patch: PatchId) {
        self.patch_mut(patch).visual_updates += 1;
    }

    fn diag(&self, patch: PatchId) -> u16 {
        self.patch(patch).diag
    }

    fn set_diag(&mut self, patch: PatchId, diag: u16) {
        self.patch_mut(patch).diag = diag;
    }
}
