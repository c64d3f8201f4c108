// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An indexable skiplist keyed by `(f32, UnitId)`, used to build the
//! cross-linked ordered-list backend.
//!
//! Keys are compared with a small epsilon so that floating-point jitter
//! doesn't reorder nodes that are, for this index's purposes, at the same
//! coordinate; ties are then broken by id so the order is total. Nodes live
//! in a flat arena and are linked both forward and backward at every level
//! they participate in, so a handle can be erased in `O(level)` without a
//! search and the list can be walked in either direction from any node.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::rng::LevelRng;
use crate::UnitId;

/// Highest level a node may reach. Matches the `kMaxLevel` of the ordered
/// list this backend is built from; at `2^-14` odds per extra level this is
/// far more headroom than any realistic population needs.
pub(crate) const L_MAX: usize = 14;

/// Tolerance below which two keys are treated as equal for ordering
/// purposes, falling through to the id tie-break.
const KEY_EPS: f32 = 1e-6;

const HEAD: u32 = 0;
const TAIL: u32 = 1;

type Links = SmallVec<[u32; 4]>;

struct Node {
    key: f32,
    /// `None` only for the two sentinels.
    slot: Option<usize>,
    level: usize,
    next: Links,
    prev: Links,
}

impl Node {
    fn sentinel(key: f32) -> Self {
        Self {
            key,
            slot: None,
            level: L_MAX,
            next: SmallVec::from_elem(TAIL, L_MAX),
            prev: SmallVec::from_elem(HEAD, L_MAX),
        }
    }
}

/// A handle into a [`SkipList`]. Stable across `reinsert` (which keeps the
/// node's arena slot and level, only its key changes); invalidated by
/// [`SkipList::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SkipHandle(u32);

/// An intrusive, arena-backed skiplist over `(f32, UnitId)` keys.
pub(crate) struct SkipList {
    nodes: Vec<Node>,
    free: Vec<u32>,
}

impl SkipList {
    pub(crate) fn new() -> Self {
        let mut nodes = Vec::with_capacity(2);
        nodes.push(Node::sentinel(f32::NEG_INFINITY));
        nodes.push(Node::sentinel(f32::INFINITY));
        Self {
            nodes,
            free: Vec::new(),
        }
    }

    fn less(&self, a_idx: u32, key: f32, slot: usize) -> bool {
        let node = &self.nodes[a_idx as usize];
        if a_idx == HEAD {
            return true;
        }
        if a_idx == TAIL {
            return false;
        }
        if (node.key - key).abs() > KEY_EPS {
            node.key < key
        } else {
            node.slot.expect("non-sentinel node has a slot") < slot
        }
    }

    /// For each level, the last node strictly before where `(key, slot)`
    /// would sit.
    fn find_prevs(&self, key: f32, slot: usize) -> [u32; L_MAX] {
        let mut prevs = [HEAD; L_MAX];
        let mut cur = HEAD;
        for level in (0..L_MAX).rev() {
            loop {
                let next = self.nodes[cur as usize].next[level];
                if next != TAIL && self.less(next, key, slot) {
                    cur = next;
                } else {
                    break;
                }
            }
            prevs[level] = cur;
        }
        prevs
    }

    fn alloc(&mut self, key: f32, slot: usize, level: usize) -> u32 {
        let node = Node {
            key,
            slot: Some(slot),
            level,
            next: SmallVec::from_elem(TAIL, level),
            prev: SmallVec::from_elem(HEAD, level),
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = node;
            idx
        } else {
            self.nodes.push(node);
            (self.nodes.len() - 1) as u32
        }
    }

    fn link(&mut self, idx: u32, prevs: &[u32; L_MAX]) {
        let level = self.nodes[idx as usize].level;
        for l in 0..level {
            let p = prevs[l];
            let n = self.nodes[p as usize].next[l];
            self.nodes[idx as usize].next[l] = n;
            self.nodes[idx as usize].prev[l] = p;
            self.nodes[p as usize].next[l] = idx;
            self.nodes[n as usize].prev[l] = idx;
        }
    }

    fn random_level(rng: &mut dyn LevelRng) -> usize {
        let mut level = 1;
        while level < L_MAX && rng.next_bool() {
            level += 1;
        }
        level
    }

    /// Inserts a new `(key, slot)` pair, drawing a fresh random level.
    pub(crate) fn insert(&mut self, key: f32, slot: usize, rng: &mut dyn LevelRng) -> SkipHandle {
        let level = Self::random_level(rng);
        let prevs = self.find_prevs(key, slot);
        let idx = self.alloc(key, slot, level);
        self.link(idx, &prevs);
        SkipHandle(idx)
    }

    /// Unlinks a node without freeing its arena slot.
    fn unlink(&mut self, handle: SkipHandle) {
        let idx = handle.0;
        let level = self.nodes[idx as usize].level;
        for l in 0..level {
            let p = self.nodes[idx as usize].prev[l];
            let n = self.nodes[idx as usize].next[l];
            self.nodes[p as usize].next[l] = n;
            self.nodes[n as usize].prev[l] = p;
        }
    }

    /// Moves an existing node to the position implied by `new_key`, keeping
    /// its arena slot, level and handle identity. Cheaper than a remove plus
    /// insert since no new level is drawn.
    pub(crate) fn reinsert(&mut self, handle: SkipHandle, new_key: f32) {
        self.unlink(handle);
        let slot = self.nodes[handle.0 as usize]
            .slot
            .expect("non-sentinel node has a slot");
        self.nodes[handle.0 as usize].key = new_key;
        let prevs = self.find_prevs(new_key, slot);
        self.link(handle.0, &prevs);
    }

    /// Unlinks and frees a node. The handle must not be used afterward.
    pub(crate) fn remove(&mut self, handle: SkipHandle) {
        self.unlink(handle);
        self.free.push(handle.0);
    }

    pub(crate) fn next(&self, handle: SkipHandle) -> u32 {
        self.nodes[handle.0 as usize].next[0]
    }

    pub(crate) fn prev(&self, handle: SkipHandle) -> u32 {
        self.nodes[handle.0 as usize].prev[0]
    }

    /// Visits nodes from `start` forward (level 0), stopping at the tail
    /// sentinel or as soon as `visit` returns `false`.
    pub(crate) fn walk_forward<F: FnMut(f32, usize) -> bool>(&self, start: u32, mut visit: F) {
        let mut cur = start;
        while cur != TAIL {
            let node = &self.nodes[cur as usize];
            if !visit(node.key, node.slot.expect("non-sentinel node has a slot")) {
                break;
            }
            cur = node.next[0];
        }
    }

    /// Visits nodes from `start` backward (level 0), stopping at the head
    /// sentinel or as soon as `visit` returns `false`.
    pub(crate) fn walk_backward<F: FnMut(f32, usize) -> bool>(&self, start: u32, mut visit: F) {
        let mut cur = start;
        while cur != HEAD {
            let node = &self.nodes[cur as usize];
            if !visit(node.key, node.slot.expect("non-sentinel node has a slot")) {
                break;
            }
            cur = node.prev[0];
        }
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SplitMix64;

    fn collect_forward(list: &SkipList) -> alloc::vec::Vec<usize> {
        let mut out = alloc::vec::Vec::new();
        list.walk_forward(list.nodes[HEAD as usize].next[0], |_, slot| {
            out.push(slot);
            true
        });
        out
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let mut list = SkipList::new();
        let mut rng = SplitMix64::new(7);
        let pairs = [(3.0, 0usize), (1.0, 1), (4.0, 2), (1.0, 3), (2.0, 4)];
        for &(key, slot) in &pairs {
            list.insert(key, slot, &mut rng);
        }
        let order = collect_forward(&list);
        // (1.0, 1) and (1.0, 3) tie on key, broken by slot id.
        assert_eq!(order, alloc::vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn erase_unlinks_at_every_level() {
        let mut list = SkipList::new();
        let mut rng = SplitMix64::new(11);
        let h0 = list.insert(1.0, 0, &mut rng);
        let h1 = list.insert(2.0, 1, &mut rng);
        let _h2 = list.insert(3.0, 2, &mut rng);
        list.remove(h1);
        assert_eq!(collect_forward(&list), alloc::vec![0, 2]);
        // h0's neighbors are now directly h2 at level 0.
        assert_eq!(list.next(h0), {
            let mut cur = 0u32;
            while list.nodes[cur as usize].slot != Some(2) {
                cur = list.nodes[cur as usize].next[0];
            }
            cur
        });
    }

    #[test]
    fn reinsert_preserves_handle_and_moves_position() {
        let mut list = SkipList::new();
        let mut rng = SplitMix64::new(5);
        let h0 = list.insert(1.0, 0, &mut rng);
        let _h1 = list.insert(5.0, 1, &mut rng);
        list.reinsert(h0, 10.0);
        assert_eq!(collect_forward(&list), alloc::vec![1, 0]);
        assert_eq!(list.next(h0), TAIL);
    }

    #[test]
    fn walk_backward_from_prev_excludes_self() {
        let mut list = SkipList::new();
        let mut rng = SplitMix64::new(3);
        let h0 = list.insert(1.0, 0, &mut rng);
        let _h1 = list.insert(2.0, 1, &mut rng);
        let _h2 = list.insert(3.0, 2, &mut rng);
        let mut seen = alloc::vec::Vec::new();
        list.walk_backward(list.prev(h0), |_, slot| {
            seen.push(slot);
            true
        });
        assert!(seen.is_empty());
    }
}
