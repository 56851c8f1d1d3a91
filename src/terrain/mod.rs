mod memory;

pub use memory::MemoryTerrain;
use serde::{Serialize, Deserialize};

/// Height samples per patch edge, minus one (the grid is `HEIGHT_CELLS + 1` square).
pub const HEIGHT_CELLS: usize = 4;
/// Visual cells per patch edge.
pub const VISUAL_CELLS: usize = 8;

pub type HeightMap = [[u16; HEIGHT_CELLS + 1]; HEIGHT_CELLS + 1];
pub type VisualMap = [[u16; VISUAL_CELLS]; VISUAL_CELLS];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatchId(pub u32);

impl PatchId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a terrain reports when a patch leaves storage but stays alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detached {
    pub x: i32,
    pub y: i32,
    /// Memory now retained by whoever holds the detached patch.
    pub bytes: usize,
}

/// Patch storage as the history engine sees it.
///
/// Handles must stay valid while a patch is detached: the engine reattaches
/// the very same patch on undo/redo and only calls `dispose_patch` once the
/// record holding it is dropped.
pub trait TerrainStore {
    /// Create a patch filled with height `z` and attach it at `(x, y)`.
    fn add_patch(&mut self, terrain: TerrainId, x: i32, y: i32, z: u16) -> PatchId;
    fn detach_patch(&mut self, terrain: TerrainId, patch: PatchId) -> Detached;
    /// Returns the bytes that are no longer retained outside storage.
    fn attach_patch(&mut self, terrain: TerrainId, patch: PatchId, x: i32, y: i32) -> usize;
    /// Free a detached patch, returning its retained cost.
    fn dispose_patch(&mut self, patch: PatchId) -> usize;

    fn height_map(&self, patch: PatchId) -> &HeightMap;
    fn height_map_mut(&mut self, patch: PatchId) -> &mut HeightMap;
    /// Called after the height grid was replaced wholesale.
    fn height_map_updated(&mut self, patch: PatchId);

    fn visual_map(&self, patch: PatchId) -> &VisualMap;
    fn visual_map_mut(&mut self, patch: PatchId) -> &mut VisualMap;
    fn visual_map_updated(&mut self, patch: PatchId);

    /// Diagonal orientation bitmask, one bit per height cell.
    fn diag(&self, patch: PatchId) -> u16;
    fn set_diag(&mut self, patch: PatchId, diag: u16);
}
