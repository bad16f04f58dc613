//! A single indexed point and its per-layer adjacency lists.

use smallvec::SmallVec;

/// Per-layer adjacency list. The inline capacity covers typical degree
/// caps without spilling to the heap.
pub(crate) type FriendList = SmallVec<[u32; 16]>;

/// One indexed point: a stable id, the owned vector, and one adjacency
/// list per layer `0..=top_layer`.
///
/// Adjacency holds `u32` ids into the index's node arena, never owned
/// pointers; the graph is cyclic by construction and the arena is the
/// single owner.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    id: u32,
    vector: Vec<f32>,
    friends: Vec<FriendList>,
}

impl Node {
    /// Create a node participating in layers `0..=top_layer`, all empty.
    pub(crate) fn new(id: u32, vector: Vec<f32>, top_layer: usize) -> Self {
        Self {
            id,
            vector,
            friends: vec![FriendList::new(); top_layer + 1],
        }
    }

    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// Highest layer this node participates in.
    pub(crate) fn top_layer(&self) -> usize {
        self.friends.len() - 1
    }

    /// Neighbor ids at `layer`; empty when the node does not reach it.
    pub(crate) fn friends(&self, layer: usize) -> &[u32] {
        match self.friends.get(layer) {
            Some(list) => list,
            None => &[],
        }
    }

    /// Append `id` at `layer` unless the list already holds `cap` entries.
    /// Returns whether the append happened.
    pub(crate) fn push_friend(&mut self, layer: usize, id: u32, cap: usize) -> bool {
        let list = &mut self.friends[layer];
        if list.len() < cap {
            list.push(id);
            true
        } else {
            false
        }
    }

    /// Replace the friend at position `idx` of `layer` with `id`.
    pub(crate) fn replace_friend(&mut self, layer: usize, idx: usize, id: u32) {
        self.friends[layer][idx] = id;
    }
}
