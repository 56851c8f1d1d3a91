use std::mem::size_of;
use crate::document::EditHost;
use crate::scene::{InstId, InstanceParams, InstanceStore};
use crate::terrain::{HeightMap, PatchId, TerrainId, TerrainStore, VisualMap};
use super::bytes::ByteLedger;
use super::chain::{NodeId, LINK_BYTES};

/// Which side of the history a command is being moved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Group,
    PatchCreate,
    PatchUpdateHeight,
    PatchUpdateVisual,
    PatchDiag,
    InstCreate,
}

impl CommandKind {
    pub fn description(self) -> &'static str {
        match self {
            CommandKind::Group => "Group",
            CommandKind::PatchCreate => "Create/Delete Patch",
            CommandKind::PatchUpdateHeight => "Edit Heights",
            CommandKind::PatchUpdateVisual => "Paint Patch",
            CommandKind::PatchDiag => "Flip Diagonals",
            CommandKind::InstCreate => "Create/Delete Instance",
        }
    }

    /// Bytes a record of this kind retains, links included. Detached patches
    /// held by `PatchCreate` are accounted separately.
    pub fn fixed_bytes(self) -> usize {
        LINK_BYTES
            + match self {
                CommandKind::Group => size_of::<Group>(),
                CommandKind::PatchCreate => size_of::<PatchCreate>(),
                CommandKind::PatchUpdateHeight => size_of::<PatchUpdateHeight>() + size_of::<HeightMap>(),
                CommandKind::PatchUpdateVisual => size_of::<PatchUpdateVisual>() + size_of::<VisualMap>(),
                CommandKind::PatchDiag => size_of::<PatchDiag>(),
                CommandKind::InstCreate => size_of::<InstCreate>(),
            }
    }
}

/// One recorded, reversible edit.
pub enum Command {
    Group(Group),
    PatchCreate(PatchCreate),
    PatchUpdateHeight(PatchUpdateHeight),
    PatchUpdateVisual(PatchUpdateVisual),
    PatchDiag(PatchDiag),
    InstCreate(InstCreate),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Group(_) => CommandKind::Group,
            Command::PatchCreate(_) => CommandKind::PatchCreate,
            Command::PatchUpdateHeight(_) => CommandKind::PatchUpdateHeight,
            Command::PatchUpdateVisual(_) => CommandKind::PatchUpdateVisual,
            Command::PatchDiag(_) => CommandKind::PatchDiag,
            Command::InstCreate(_) => CommandKind::InstCreate,
        }
    }

    /// Apply a leaf command. Applying twice with the direction toggled is a
    /// no-op on the host. Groups are replayed by the history, which owns the
    /// arena their children live in.
    pub fn apply_leaf<H: EditHost + ?Sized>(
        &mut self,
        direction: Direction,
        host: &mut H,
        ledger: &mut ByteLedger,
    ) {
        log::trace!("{direction:?} {}", self.kind().description());
        match self {
            Command::Group(_) => debug_assert!(false, "groups are replayed through the history"),
            Command::PatchCreate(c) => c.toggle(host.terrain(), ledger),
            Command::PatchUpdateHeight(c) => c.swap(host.terrain()),
            Command::PatchUpdateVisual(c) => c.swap(host.terrain()),
            Command::PatchDiag(c) => c.swap(host.terrain()),
            Command::InstCreate(c) => c.toggle(host.scene()),
        }
    }

    /// Give back everything this record retains. Group children must have
    /// been released already.
    pub fn release<H: EditHost + ?Sized>(self, host: &mut H, ledger: &mut ByteLedger) {
        if let Command::PatchCreate(c) = &self
            && !c.attached
        {
            ledger.sub(host.terrain().dispose_patch(c.patch));
        }
        ledger.sub(self.kind().fixed_bytes());
    }
}

/// A transaction: a private sub-chain of commands replayed as one unit.
#[derive(Default, Debug)]
pub struct Group {
    pub(crate) head: Option<NodeId>,
    pub(crate) tail: Option<NodeId>,
}

impl Group {
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Creation or deletion of a terrain patch. Both are the same attach/detach
/// toggle seen from opposite ends.
pub struct PatchCreate {
    terrain: TerrainId,
    patch: PatchId,
    x: i32,
    y: i32,
    attached: bool,
}

impl PatchCreate {
    pub fn created(terrain: TerrainId, patch: PatchId, x: i32, y: i32) -> Self {
        Self { terrain, patch, x, y, attached: true }
    }

    /// Detach `patch` now and hold on to it.
    pub fn deleted(terrain: TerrainId, patch: PatchId, store: &mut dyn TerrainStore, ledger: &mut ByteLedger) -> Self {
        let mut record = Self { terrain, patch, x: 0, y: 0, attached: true };
        record.toggle(store, ledger);
        record
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn toggle(&mut self, store: &mut dyn TerrainStore, ledger: &mut ByteLedger) {
        if self.attached {
            let detached = store.detach_patch(self.terrain, self.patch);
            self.x = detached.x;
            self.y = detached.y;
            ledger.add(detached.bytes);
        } else {
            ledger.sub(store.attach_patch(self.terrain, self.patch, self.x, self.y));
        }
        self.attached = !self.attached;
    }
}

/// Height grid and diagonal bitmask as they were before an edit.
pub struct PatchUpdateHeight {
    patch: PatchId,
    height: Box<HeightMap>,
    diag: u16,
}

impl PatchUpdateHeight {
    pub fn capture(store: &dyn TerrainStore, patch: PatchId) -> Self {
        Self {
            patch,
            height: Box::new(*store.height_map(patch)),
            diag: store.diag(patch),
        }
    }

    fn swap(&mut self, store: &mut dyn TerrainStore) {
        std::mem::swap(store.height_map_mut(self.patch), &mut *self.height);
        let live = store.diag(self.patch);
        store.height_map_updated(self.patch);
        store.set_diag(self.patch, std::mem::replace(&mut self.diag, live));
    }
}

/// Visual grid as it was before an edit.
pub struct PatchUpdateVisual {
    patch: PatchId,
    visual: Box<VisualMap>,
}

impl PatchUpdateVisual {
    pub fn capture(store: &dyn TerrainStore, patch: PatchId) -> Self {
        Self {
            patch,
            visual: Box::new(*store.visual_map(patch)),
        }
    }

    fn swap(&mut self, store: &mut dyn TerrainStore) {
        std::mem::swap(store.visual_map_mut(self.patch), &mut *self.visual);
        store.visual_map_updated(self.patch);
    }
}

pub struct PatchDiag {
    patch: PatchId,
    diag: u16,
}

impl PatchDiag {
    pub fn capture(store: &dyn TerrainStore, patch: PatchId) -> Self {
        Self { patch, diag: store.diag(patch) }
    }

    fn swap(&mut self, store: &mut dyn TerrainStore) {
        let live = store.diag(self.patch);
        store.set_diag(self.patch, std::mem::replace(&mut self.diag, live));
    }
}

/// Creation or deletion of a scene instance. The handle stays reserved while
/// the instance is gone so it comes back as the same instance.
pub struct InstCreate {
    inst: InstId,
    live: bool,
    params: InstanceParams,
}

impl InstCreate {
    pub fn created(inst: InstId, params: InstanceParams) -> Self {
        Self { inst, live: true, params }
    }

    /// Capture `inst`, then delete it.
    pub fn deleted(inst: InstId, store: &mut dyn InstanceStore) -> Self {
        let params = store.instance_params(inst);
        let mut record = Self { inst, live: true, params };
        record.toggle(store);
        record
    }

    /// The instance handle while it exists.
    pub fn live_instance(&self) -> Option<InstId> {
        self.live.then_some(self.inst)
    }

    fn toggle(&mut self, store: &mut dyn InstanceStore) {
        if self.live {
            self.params = store.instance_params(self.inst);
            store.delete_instance(self.inst);
        } else {
            store.restore_instance(self.inst, &self.params);
        }
        self.live = !self.live;

        let world = match &self.params {
            InstanceParams::Mesh(placement) => store.mesh_world(placement.mesh),
            InstanceParams::Sprite(placement) => placement.world,
        };
        store.rebuild_world(world);
    }
}
