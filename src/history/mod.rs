pub mod bytes;
pub mod chain;
pub mod commands;

use glam::DMat4;
use crate::document::EditHost;
use crate::scene::{InstId, InstanceParams, MeshId, MeshPlacement, SpritePlacement};
use crate::settings::HistorySettings;
use crate::terrain::{PatchId, TerrainId};
use bytes::ByteLedger;
use chain::{Chain, NodeId};
use commands::{
    Command, CommandKind, Direction, Group, InstCreate, PatchCreate, PatchDiag, PatchUpdateHeight,
    PatchUpdateVisual,
};

/// Hard limit on simultaneously open groups.
pub const MAX_OPEN_GROUPS: usize = 64;

/// Summary of one top-level history entry, for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub kind: CommandKind,
    /// Direct children, for groups.
    pub children: usize,
}

/// Nested transactional undo/redo history.
///
/// Commands form one doubly linked chain split by a cursor: `undo` is the
/// last applied command, `redo` the first reverted one. While a group is open
/// new commands land in its private sub-chain and nothing can be undone or
/// redone. A multi-level undo/redo may leave the cursor inside a partially
/// reverted group; `descent` remembers which groups it stepped into.
pub struct History {
    chain: Chain,
    undo: Option<NodeId>,
    redo: Option<NodeId>,
    /// Groups currently being recorded, innermost last.
    open: Vec<NodeId>,
    /// Groups the cursor is currently inside of, outermost first.
    descent: Vec<NodeId>,
    bytes: ByteLedger,
    settings: HistorySettings,
    /// Set on every recorded, undone or redone edit; cleared by `mark_saved()`.
    pub dirty: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_settings(HistorySettings::default())
    }

    pub fn with_settings(settings: HistorySettings) -> Self {
        Self {
            chain: Chain::default(),
            undo: None,
            redo: None,
            open: Vec::new(),
            descent: Vec::new(),
            bytes: ByteLedger::default(),
            settings: settings.clamped(),
            dirty: false,
        }
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    // ---- transactions ----

    /// Begin a (possibly nested) transaction.
    pub fn open<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        assert!(
            self.open.len() < self.settings.max_open_groups,
            "more than {} nested history groups",
            self.settings.max_open_groups
        );
        if self.open.is_empty() {
            self.cut_redo(host);
        }
        let group = self.append(Command::Group(Group::default()));
        self.open.push(group);
        self.undo = None;
        self.redo = None;
        log::debug!("opened history group at depth {}", self.open.len());
    }

    /// End the innermost transaction. An empty one is dropped without a trace.
    pub fn close<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        let Some(group) = self.open.pop() else {
            panic!("close() without a matching open()");
        };
        let depth = self.open.len() + 1;

        if self.chain.group(group).is_some_and(Group::is_empty) {
            let prev = self.chain.prev(group);
            self.chain.link(prev, None);
            if let Some(&parent) = self.open.last() {
                let parent = self.chain.group_mut(parent);
                parent.tail = prev;
                if parent.head == Some(group) {
                    parent.head = None;
                }
            }
            self.undo = prev;
            self.release(group, host);
            log::debug!("discarded empty history group at depth {depth}");
            return;
        }

        self.chain.group_mut(group).tail = self.undo;
        self.undo = Some(group);
        log::debug!("closed history group at depth {depth}");
    }

    // ---- recording ----

    /// Create a patch and record it. Undo detaches it again.
    pub fn record_patch_create<H: EditHost + ?Sized>(
        &mut self,
        host: &mut H,
        terrain: TerrainId,
        x: i32,
        y: i32,
        z: u16,
    ) -> PatchId {
        self.begin_record(host);
        let patch = host.terrain().add_patch(terrain, x, y, z);
        self.append(Command::PatchCreate(PatchCreate::created(terrain, patch, x, y)));
        patch
    }

    /// Detach a patch and keep it so undo can bring it back.
    pub fn record_patch_delete<H: EditHost + ?Sized>(&mut self, host: &mut H, terrain: TerrainId, patch: PatchId) {
        self.begin_record(host);
        let record = PatchCreate::deleted(terrain, patch, host.terrain(), &mut self.bytes);
        self.append(Command::PatchCreate(record));
    }

    /// Call before changing a patch's height grid or diagonals.
    pub fn record_height_edit<H: EditHost + ?Sized>(&mut self, host: &mut H, patch: PatchId) {
        self.begin_record(host);
        let record = PatchUpdateHeight::capture(host.terrain(), patch);
        self.append(Command::PatchUpdateHeight(record));
    }

    /// Call before changing a patch's visual grid.
    pub fn record_visual_edit<H: EditHost + ?Sized>(&mut self, host: &mut H, patch: PatchId) {
        self.begin_record(host);
        let record = PatchUpdateVisual::capture(host.terrain(), patch);
        self.append(Command::PatchUpdateVisual(record));
    }

    /// Call before changing a patch's diagonal bitmask.
    pub fn record_diag_edit<H: EditHost + ?Sized>(&mut self, host: &mut H, patch: PatchId) {
        self.begin_record(host);
        let record = PatchDiag::capture(host.terrain(), patch);
        self.append(Command::PatchDiag(record));
    }

    pub fn record_mesh_instance<H: EditHost + ?Sized>(
        &mut self,
        host: &mut H,
        mesh: MeshId,
        flags: u32,
        transform: DMat4,
    ) -> InstId {
        self.record_instance_create(host, InstanceParams::Mesh(MeshPlacement { mesh, flags, transform }))
    }

    pub fn record_sprite_instance<H: EditHost + ?Sized>(&mut self, host: &mut H, placement: SpritePlacement) -> InstId {
        self.record_instance_create(host, InstanceParams::Sprite(placement))
    }

    /// Create an instance and record it. Undo deletes it again.
    pub fn record_instance_create<H: EditHost + ?Sized>(&mut self, host: &mut H, params: InstanceParams) -> InstId {
        self.begin_record(host);
        let inst = host.scene().create_instance(&params);
        self.append(Command::InstCreate(InstCreate::created(inst, params)));
        inst
    }

    /// Delete an instance, remembering how to rebuild it.
    pub fn record_instance_delete<H: EditHost + ?Sized>(&mut self, host: &mut H, inst: InstId) {
        self.begin_record(host);
        let record = InstCreate::deleted(inst, host.scene());
        self.append(Command::InstCreate(record));
    }

    // ---- traversal ----

    /// Revert one step. `max_depth` is how many group levels the step may
    /// descend into: 0 reverts the whole previous top-level entry, 1 reverts
    /// one child of it, and so on.
    pub fn undo<H: EditHost + ?Sized>(&mut self, max_depth: usize, host: &mut H) {
        assert!(self.open.is_empty(), "undo while a history group is open");

        while self.undo.is_none() {
            let Some(group) = self.descent.pop() else { break };
            self.undo = self.chain.prev(group);
            self.redo = Some(group);
        }

        while let Some(current) = self.undo
            && self.chain.is_group(current)
            && self.descent.len() < max_depth
        {
            self.descent.push(current);
            self.undo = self.chain.group(current).and_then(|g| g.tail);
            self.redo = None;
        }

        if self.descent.len() <= max_depth {
            if let Some(current) = self.undo {
                self.apply(current, Direction::Undo, host);
                self.redo = Some(current);
                self.undo = self.chain.prev(current);
                self.dirty = true;
            }
            return;
        }

        // Cursor is deeper than allowed: finish reverting the groups below the bound.
        while self.descent.len() > max_depth {
            while let Some(current) = self.undo {
                self.apply(current, Direction::Undo, host);
                self.redo = Some(current);
                self.undo = self.chain.prev(current);
            }
            let Some(group) = self.descent.pop() else { break };
            self.undo = self.chain.prev(group);
            self.redo = Some(group);
        }
        self.dirty = true;
    }

    /// Reapply one step, mirroring [`History::undo`].
    pub fn redo<H: EditHost + ?Sized>(&mut self, max_depth: usize, host: &mut H) {
        assert!(self.open.is_empty(), "redo while a history group is open");

        while self.redo.is_none() {
            let Some(group) = self.descent.pop() else { break };
            self.redo = self.chain.next(group);
            self.undo = Some(group);
        }

        while let Some(current) = self.redo
            && self.chain.is_group(current)
            && self.descent.len() < max_depth
        {
            self.descent.push(current);
            self.redo = self.chain.group(current).and_then(|g| g.head);
            self.undo = None;
        }

        if self.descent.len() <= max_depth {
            if let Some(current) = self.redo {
                self.apply(current, Direction::Redo, host);
                self.undo = Some(current);
                self.redo = self.chain.next(current);
                self.dirty = true;
            }
            return;
        }

        while self.descent.len() > max_depth {
            while let Some(current) = self.redo {
                self.apply(current, Direction::Redo, host);
                self.undo = Some(current);
                self.redo = self.chain.next(current);
            }
            let Some(group) = self.descent.pop() else { break };
            self.redo = self.chain.next(group);
            self.undo = Some(group);
        }
        self.dirty = true;
    }

    /// Undo by the configured fine step depth.
    pub fn undo_step<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        self.undo(self.settings.fine_step_depth, host);
    }

    pub fn redo_step<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        self.redo(self.settings.fine_step_depth, host);
    }

    /// Undo the whole previous top-level entry.
    pub fn undo_transaction<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        self.undo(0, host);
    }

    pub fn redo_transaction<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        self.redo(0, host);
    }

    /// Drop the entire history, both directions.
    pub fn purge<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        assert!(self.open.is_empty(), "purge while a history group is open");
        self.cut_undo(host);
        self.cut_redo(host);
        debug_assert_eq!(self.chain.live(), 0);
        log::debug!("purged history, {} bytes still retained", self.bytes.total());
    }

    // ---- queries ----

    pub fn can_undo(&self) -> bool {
        if !self.open.is_empty() {
            return false;
        }
        self.undo.is_some() || self.descent.iter().any(|&g| self.chain.prev(g).is_some())
    }

    pub fn can_redo(&self) -> bool {
        if !self.open.is_empty() {
            return false;
        }
        self.redo.is_some() || self.descent.iter().any(|&g| self.chain.next(g).is_some())
    }

    /// Memory retained by history, including detached patches it holds.
    pub fn bytes(&self) -> usize {
        self.bytes.total()
    }

    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_recording(&self) -> bool {
        !self.open.is_empty()
    }

    /// Number of top-level entries, applied or not.
    pub fn len(&self) -> usize {
        self.top_level_nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-level entries from oldest to newest.
    pub fn top_level(&self) -> Vec<Entry> {
        self.top_level_nodes()
            .map(|id| {
                let command = self.chain.command(id);
                let children = match command {
                    Command::Group(group) => self.chain.forward(group.head).count(),
                    _ => 0,
                };
                Entry { kind: command.kind(), children }
            })
            .collect()
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ---- internals ----

    fn top_level_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        let anchor = self
            .open
            .first()
            .or(self.descent.first())
            .copied()
            .or(self.undo)
            .or(self.redo);
        let head = self.chain.backward(anchor).last();
        self.chain.forward(head)
    }

    /// Recording outside any group discards the reverted future.
    fn begin_record<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        if self.open.is_empty() {
            self.cut_redo(host);
        }
        self.dirty = true;
    }

    /// Link `command` in after the cursor, inside the innermost open group.
    fn append(&mut self, command: Command) -> NodeId {
        self.bytes.add(command.kind().fixed_bytes());
        let id = self.chain.push_after(self.undo, command);
        if let Some(&parent) = self.open.last() {
            let parent = self.chain.group_mut(parent);
            if parent.head.is_none() {
                parent.head = Some(id);
            }
            parent.tail = Some(id);
        }
        self.undo = Some(id);
        id
    }

    fn apply<H: EditHost + ?Sized>(&mut self, id: NodeId, direction: Direction, host: &mut H) {
        if let Some(group) = self.chain.group(id) {
            let children: Vec<NodeId> = match direction {
                Direction::Undo => self.chain.backward(group.tail).collect(),
                Direction::Redo => self.chain.forward(group.head).collect(),
            };
            for child in children {
                self.apply(child, direction, host);
            }
            return;
        }
        self.chain.command_mut(id).apply_leaf(direction, host, &mut self.bytes);
    }

    /// Free a node that is already unlinked, and everything under it.
    fn release<H: EditHost + ?Sized>(&mut self, id: NodeId, host: &mut H) {
        if let Some(group) = self.chain.group(id) {
            let children: Vec<NodeId> = self.chain.forward(group.head).collect();
            for child in children {
                self.release(child, host);
            }
        }
        self.chain.remove(id).release(host, &mut self.bytes);
    }

    /// Discard everything on the redo side, trimming the groups the cursor
    /// is inside of and dropping any that end up empty.
    fn cut_redo<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        let mut freed = 0;
        loop {
            let tail = self.undo;
            if let Some(tail) = tail {
                self.chain.set_next(tail, None);
            }
            while let Some(current) = self.redo {
                self.redo = self.chain.next(current);
                self.release(current, host);
                freed += 1;
            }

            let Some(group) = self.descent.pop() else { break };
            let (prev, next) = (self.chain.prev(group), self.chain.next(group));
            let trimmed = self.chain.group_mut(group);
            trimmed.tail = tail;
            if tail.is_none() {
                trimmed.head = None;
                self.release(group, host);
                self.chain.link(prev, next);
                self.undo = prev;
                self.redo = next;
            } else {
                self.undo = Some(group);
                self.redo = next;
            }
        }
        if freed > 0 {
            log::debug!("cut {freed} reverted history entries");
        }
    }

    /// Discard everything on the undo side, mirroring `cut_redo`.
    fn cut_undo<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        loop {
            let head = self.redo;
            if let Some(head) = head {
                self.chain.set_prev(head, None);
            }
            while let Some(current) = self.undo {
                self.undo = self.chain.prev(current);
                self.release(current, host);
            }

            let Some(group) = self.descent.pop() else { break };
            let (prev, next) = (self.chain.prev(group), self.chain.next(group));
            let trimmed = self.chain.group_mut(group);
            trimmed.head = head;
            if head.is_none() {
                trimmed.tail = None;
                self.release(group, host);
                self.chain.link(prev, next);
                self.undo = prev;
                self.redo = next;
            } else {
                self.redo = Some(group);
                self.undo = prev;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use super::*;
    use crate::document::Document;
    use crate::scene::{SpriteId, WorldId};
    use crate::terrain::{MemoryTerrain, TerrainStore};

    const T: TerrainId = TerrainId(0);

    fn setup() -> (History, Document, PatchId) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut doc = Document::new();
        let patch = doc.terrain.add_patch(T, 0, 0, 0);
        (History::new(), doc, patch)
    }

    /// Record a diagonal edit and then perform it.
    fn set_diag(history: &mut History, doc: &mut Document, patch: PatchId, diag: u16) {
        history.record_diag_edit(doc, patch);
        doc.terrain.set_diag(patch, diag);
    }

    /// One group holding diagonal edits to 1, 2, 3.
    fn three_step_group(history: &mut History, doc: &mut Document, patch: PatchId) {
        history.open(doc);
        for diag in 1..=3 {
            set_diag(history, doc, patch, diag);
        }
        history.close(doc);
    }

    fn diag_bytes(n: usize) -> usize {
        n * CommandKind::PatchDiag.fixed_bytes()
    }

    #[test]
    fn nested_empty_groups_vanish() {
        let (mut history, mut doc, _) = setup();
        for _ in 0..3 {
            history.open(&mut doc);
        }
        for _ in 0..3 {
            history.close(&mut doc);
        }
        assert_eq!(history.len(), 0);
        assert_eq!(history.bytes(), 0);
        assert_eq!(history.open_depth(), 0);
    }

    #[test]
    fn empty_inner_group_is_unlinked_from_parent() {
        let (mut history, mut doc, p) = setup();
        history.open(&mut doc);
        history.open(&mut doc);
        history.close(&mut doc);
        set_diag(&mut history, &mut doc, p, 1);
        history.open(&mut doc);
        history.close(&mut doc);
        set_diag(&mut history, &mut doc, p, 2);
        history.close(&mut doc);

        assert_eq!(history.top_level(), vec![Entry { kind: CommandKind::Group, children: 2 }]);
        assert_eq!(history.bytes(), CommandKind::Group.fixed_bytes() + diag_bytes(2));

        history.undo(0, &mut doc);
        assert_eq!(doc.terrain.diag(p), 0);
        history.redo(0, &mut doc);
        assert_eq!(doc.terrain.diag(p), 2);
    }

    #[test]
    fn fine_step_then_coarse_step_finishes_the_group() {
        let (mut history, mut doc, p) = setup();
        three_step_group(&mut history, &mut doc, p);

        history.undo(1, &mut doc);
        assert_eq!(doc.terrain.diag(p), 2);
        assert!(history.can_undo());
        assert!(history.can_redo());

        history.undo(0, &mut doc);
        assert_eq!(doc.terrain.diag(p), 0);
        assert!(!history.can_undo());

        history.redo(1, &mut doc);
        assert_eq!(doc.terrain.diag(p), 1);

        history.redo(0, &mut doc);
        assert_eq!(doc.terrain.diag(p), 3);
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn fine_steps_walk_out_of_a_group() {
        let (mut history, mut doc, p) = setup();
        set_diag(&mut history, &mut doc, p, 9);
        three_step_group(&mut history, &mut doc, p);

        for expected in [2, 1, 9] {
            history.undo(1, &mut doc);
            assert_eq!(doc.terrain.diag(p), expected);
        }
        history.undo(1, &mut doc);
        assert_eq!(doc.terrain.diag(p), 0);
        assert!(!history.can_undo());

        for expected in [9, 1, 2, 3] {
            history.redo(1, &mut doc);
            assert_eq!(doc.terrain.diag(p), expected);
        }
        assert!(!history.can_redo());
    }

    #[test]
    fn recording_inside_a_partial_group_trims_it() {
        let (mut history, mut doc, p) = setup();
        three_step_group(&mut history, &mut doc, p);
        history.undo(1, &mut doc);
        assert_eq!(doc.terrain.diag(p), 2);

        set_diag(&mut history, &mut doc, p, 7);
        assert_eq!(
            history.top_level(),
            vec![
                Entry { kind: CommandKind::Group, children: 2 },
                Entry { kind: CommandKind::PatchDiag, children: 0 },
            ]
        );
        assert_eq!(history.bytes(), CommandKind::Group.fixed_bytes() + diag_bytes(3));
        assert!(!history.can_redo());

        history.undo(0, &mut doc);
        assert_eq!(doc.terrain.diag(p), 2);
        history.undo(0, &mut doc);
        assert_eq!(doc.terrain.diag(p), 0);
    }

    #[test]
    fn fully_reverted_group_is_dropped_by_a_new_edit() {
        let (mut history, mut doc, p) = setup();
        history.open(&mut doc);
        set_diag(&mut history, &mut doc, p, 1);
        history.close(&mut doc);

        history.undo(1, &mut doc);
        assert_eq!(doc.terrain.diag(p), 0);
        assert!(!history.can_undo());

        set_diag(&mut history, &mut doc, p, 5);
        assert_eq!(history.top_level(), vec![Entry { kind: CommandKind::PatchDiag, children: 0 }]);
        assert_eq!(history.bytes(), diag_bytes(1));
    }

    #[test]
    fn purge_while_inside_a_group_frees_everything() {
        let (mut history, mut doc, p) = setup();
        three_step_group(&mut history, &mut doc, p);
        three_step_group(&mut history, &mut doc, p);
        history.undo(1, &mut doc);
        history.undo(1, &mut doc);

        history.purge(&mut doc);
        assert_eq!(history.bytes(), 0);
        assert_eq!(history.len(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(doc.terrain.diag(p), 1);
    }

    #[test]
    #[should_panic(expected = "undo while a history group is open")]
    fn undo_while_recording_is_fatal() {
        let (mut history, mut doc, _) = setup();
        history.open(&mut doc);
        history.undo(0, &mut doc);
    }

    #[test]
    #[should_panic(expected = "more than 2 nested history groups")]
    fn open_limit_is_fatal() {
        let mut doc = Document::new();
        let settings = HistorySettings { max_open_groups: 2, ..HistorySettings::default() };
        let mut history = History::with_settings(settings);
        for _ in 0..3 {
            history.open(&mut doc);
        }
    }

    #[test]
    #[should_panic(expected = "without a matching open")]
    fn unbalanced_close_is_fatal() {
        let (mut history, mut doc, _) = setup();
        history.close(&mut doc);
    }

    #[test]
    fn deleted_patch_is_retained_until_purged() {
        let (mut history, mut doc, p) = setup();
        let fixed = CommandKind::PatchCreate.fixed_bytes();

        history.record_patch_delete(&mut doc, T, p);
        assert_eq!(history.bytes(), fixed + MemoryTerrain::patch_bytes());
        assert_eq!(doc.terrain.patch_at(T, 0, 0), None);

        history.undo(0, &mut doc);
        assert_eq!(history.bytes(), fixed);
        assert_eq!(doc.terrain.patch_at(T, 0, 0), Some(p));

        history.redo(0, &mut doc);
        assert_eq!(history.bytes(), fixed + MemoryTerrain::patch_bytes());

        history.purge(&mut doc);
        assert_eq!(history.bytes(), 0);
        assert!(!doc.terrain.is_alive(p));
    }

    #[test]
    fn undone_patch_creation_is_disposed_by_branch_cut() {
        let (mut history, mut doc, p) = setup();
        let created = history.record_patch_create(&mut doc, T, 1, 0, 50);
        history.undo(0, &mut doc);
        assert!(doc.terrain.is_alive(created));
        assert!(!doc.terrain.is_attached(created));

        set_diag(&mut history, &mut doc, p, 1);
        assert!(!doc.terrain.is_alive(created));
        assert_eq!(history.bytes(), diag_bytes(1));
    }

    #[test]
    fn instance_creation_and_deletion_round_trip() {
        let (mut history, mut doc, _) = setup();
        doc.scene.register_mesh(MeshId(4), WorldId(2));

        let sprite = history.record_sprite_instance(
            &mut doc,
            SpritePlacement {
                world: WorldId(1),
                sprite: SpriteId(0),
                flags: 0,
                position: Vec3::new(1.0, 0.0, 1.0),
                yaw: 45.0,
                anim: 1,
                frame: 2,
                reps: [0; 4],
            },
        );
        let mesh = history.record_mesh_instance(&mut doc, MeshId(4), 3, DMat4::IDENTITY);
        history.record_instance_delete(&mut doc, sprite);
        assert!(!doc.scene.is_live(sprite));

        history.undo(0, &mut doc);
        assert!(doc.scene.is_live(sprite));
        history.undo(0, &mut doc);
        assert!(!doc.scene.is_live(mesh));
        assert_eq!(doc.scene.rebuild_count(WorldId(2)), 1);
        history.undo(0, &mut doc);
        assert_eq!(doc.scene.live_count(), 0);

        while history.can_redo() {
            history.redo(0, &mut doc);
        }
        assert!(!doc.scene.is_live(sprite));
        assert!(doc.scene.is_live(mesh));
        assert_eq!(history.bytes(), 3 * CommandKind::InstCreate.fixed_bytes());
    }

    #[test]
    fn dirty_tracks_unsaved_edits() {
        let (mut history, mut doc, p) = setup();
        assert!(!history.dirty);
        set_diag(&mut history, &mut doc, p, 1);
        assert!(history.dirty);
        history.mark_saved();
        history.undo(0, &mut doc);
        assert!(history.dirty);
        history.mark_saved();
        history.undo(0, &mut doc);
        assert!(!history.dirty);
    }

    #[test]
    fn step_helpers_follow_settings() {
        let (mut history, mut doc, p) = setup();
        three_step_group(&mut history, &mut doc, p);
        history.undo_step(&mut doc);
        assert_eq!(doc.terrain.diag(p), 2);
        history.undo_transaction(&mut doc);
        assert_eq!(doc.terrain.diag(p), 0);
        history.redo_step(&mut doc);
        assert_eq!(doc.terrain.diag(p), 1);
        history.redo_transaction(&mut doc);
        assert_eq!(doc.terrain.diag(p), 3);
    }
}
