//! Nested transactional undo/redo for a terrain and scene editor.
//!
//! Editing code opens and closes groups on a [`History`] and records each
//! reversible change just before (or as) it happens. The history swaps
//! snapshots with live patch grids, toggles patch attachment and instance
//! existence, and replays whole groups as single steps.
//!
//! Terrain storage and scene instances are collaborators reached through
//! [`TerrainStore`] and [`InstanceStore`], bundled by an [`EditHost`].
//! [`Document`] is an in-memory host built from the reference stores.

pub mod document;
pub mod history;
pub mod scene;
pub mod settings;
pub mod terrain;

pub use document::{Document, EditHost};
pub use history::commands::{CommandKind, Direction};
pub use history::{Entry, History, MAX_OPEN_GROUPS};
pub use scene::{InstId, InstanceParams, InstanceStore, MeshId, MeshPlacement, SpriteId, SpritePlacement, WorldId};
pub use settings::HistorySettings;
pub use terrain::{Detached, PatchId, TerrainId, TerrainStore, HEIGHT_CELLS, VISUAL_CELLS};
