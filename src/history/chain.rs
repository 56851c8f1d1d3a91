//! Arena storage for recorded commands.
//!
//! Every command lives in exactly one slot and is linked to its neighbours by
//! index, so a node can only ever sit in one chain: the top-level history or a
//! single group's sub-chain. Freed slots are reused.

use super::commands::{Command, Group};

/// Stable handle to a recorded command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bytes every node spends on its chain links.
pub const LINK_BYTES: usize = 2 * std::mem::size_of::<Option<NodeId>>();

struct Node {
    prev: Option<NodeId>,
    next: Option<NodeId>,
    command: Command,
}

#[derive(Default)]
pub struct Chain {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl Chain {
    /// Store `command` right after `prev`, which must be the end of its chain.
    pub fn push_after(&mut self, prev: Option<NodeId>, command: Command) -> NodeId {
        let node = Node { prev, next: None, command };
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() as u32 - 1)
            }
        };
        if let Some(prev) = prev {
            self.node_mut(prev).next = Some(id);
        }
        id
    }

    /// Take a node out of the arena. Neighbour links are left to the caller.
    pub fn remove(&mut self, id: NodeId) -> Command {
        let node = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("{id:?} was already freed"));
        self.free.push(id.0);
        node.command
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    pub fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        self.node_mut(id).prev = prev;
    }

    pub fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        self.node_mut(id).next = next;
    }

    /// Make `a` and `b` direct neighbours. Either side may be absent.
    pub fn link(&mut self, a: Option<NodeId>, b: Option<NodeId>) {
        if let Some(a) = a {
            self.set_next(a, b);
        }
        if let Some(b) = b {
            self.set_prev(b, a);
        }
    }

    pub fn command(&self, id: NodeId) -> &Command {
        &self.node(id).command
    }

    pub fn command_mut(&mut self, id: NodeId) -> &mut Command {
        &mut self.node_mut(id).command
    }

    pub fn group(&self, id: NodeId) -> Option<&Group> {
        match self.command(id) {
            Command::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Panics if `id` is not a group.
    pub fn group_mut(&mut self, id: NodeId) -> &mut Group {
        match self.command_mut(id) {
            Command::Group(group) => group,
            other => panic!("{id:?} is {:?}, not a group", other.kind()),
        }
    }

    pub fn is_group(&self, id: NodeId) -> bool {
        self.group(id).is_some()
    }

    /// Walk from `start` towards the head.
    pub fn backward(&self, start: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(start, |&id| self.prev(id))
    }

    /// Walk from `start` towards the tail.
    pub fn forward(&self, start: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(start, |&id| self.next(id))
    }

    /// Number of live nodes across every chain.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn node(&self, id: NodeId) -> &Node {
        self.slots[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{id:?} was freed"))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("{id:?} was freed"))
    }
}
