// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cross-linked ordered-list backend: two skiplists, one keyed by `x`
//! and one by `y`, intersected at query time.
//!
//! A slot's neighborhood is found by walking outward from its own node in
//! both lists until the key distance exceeds the query range, then keeping
//! only the slots that showed up in both walks. The two walks only ever
//! touch nodes within `range` of the query slot on their own axis, so this
//! stays cheap even in a crowded world as long as units aren't clustered on
//! a single coordinate.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::backend::Backend;
use crate::rng::{LevelRng, SplitMix64};
use crate::skiplist::{SkipHandle, SkipList};

/// [`Backend`] built from two cross-linked skiplists, one per axis.
pub struct CrosslinkBackend {
    x_list: SkipList,
    y_list: SkipList,
    handles: Vec<Option<(SkipHandle, SkipHandle)>>,
    rng: SplitMix64,
}

impl core::fmt::Debug for CrosslinkBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CrosslinkBackend")
            .field("tracked", &self.handles.iter().filter(|h| h.is_some()).count())
            .finish_non_exhaustive()
    }
}

impl CrosslinkBackend {
    fn ensure_capacity(&mut self, slot: usize) {
        if slot >= self.handles.len() {
            self.handles.resize(slot + 1, None);
        }
    }

    fn axis_candidates(list: &SkipList, handle: SkipHandle, key: f32, range: f32) -> BTreeSet<usize> {
        let mut set = BTreeSet::new();
        let fwd = list.next(handle);
        list.walk_forward(fwd, |other_key, slot| {
            if (other_key - key).abs() <= range {
                set.insert(slot);
                true
            } else {
                false
            }
        });
        let bwd = list.prev(handle);
        list.walk_backward(bwd, |other_key, slot| {
            if (other_key - key).abs() <= range {
                set.insert(slot);
                true
            } else {
                false
            }
        });
        set
    }
}

impl Backend for CrosslinkBackend {
    fn new(_width: f32, _height: f32, _r: f32) -> Self {
        Self {
            x_list: SkipList::new(),
            y_list: SkipList::new(),
            handles: Vec::new(),
            rng: SplitMix64::default(),
        }
    }

    fn insert(&mut self, slot: usize, x: f32, y: f32) {
        self.ensure_capacity(slot);
        let x_handle = self.x_list.insert(x, slot, &mut self.rng as &mut dyn LevelRng);
        let y_handle = self.y_list.insert(y, slot, &mut self.rng as &mut dyn LevelRng);
        self.handles[slot] = Some((x_handle, y_handle));
    }

    fn update(&mut self, slot: usize, x: f32, y: f32) {
        let (x_handle, y_handle) = self.handles[slot].expect("slot must be tracked");
        self.x_list.reinsert(x_handle, x);
        self.y_list.reinsert(y_handle, y);
    }

    fn remove(&mut self, slot: usize) {
        let (x_handle, y_handle) = self.handles[slot].take().expect("slot must be tracked");
        self.x_list.remove(x_handle);
        self.y_list.remove(y_handle);
    }

    fn visit_candidates<F: FnMut(usize)>(&self, slot: usize, x: f32, y: f32, range: f32, mut f: F) {
        let (x_handle, y_handle) = self.handles[slot].expect("slot must be tracked");
        let x_set = Self::axis_candidates(&self.x_list, x_handle, x, range);
        if x_set.is_empty() {
            return;
        }
        let y_set = Self::axis_candidates(&self.y_list, y_handle, y, range);
        for &candidate in x_set.intersection(&y_set) {
            f(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn nearby(backend: &CrosslinkBackend, slot: usize, x: f32, y: f32, range: f32) -> Vec<usize> {
        let mut out = Vec::new();
        backend.visit_candidates(slot, x, y, range, |s| out.push(s));
        out.sort_unstable();
        out
    }

    #[test]
    fn finds_only_units_within_chebyshev_range() {
        let mut backend = CrosslinkBackend::new(100.0, 100.0, 5.0);
        backend.insert(0, 10.0, 10.0);
        backend.insert(1, 12.0, 12.0);
        backend.insert(2, 20.0, 20.0);
        assert_eq!(nearby(&backend, 0, 10.0, 10.0, 5.0), vec![1]);
        assert_eq!(nearby(&backend, 0, 10.0, 10.0, 20.0), vec![1, 2]);
    }

    #[test]
    fn update_moves_membership() {
        let mut backend = CrosslinkBackend::new(100.0, 100.0, 5.0);
        backend.insert(0, 0.0, 0.0);
        backend.insert(1, 50.0, 50.0);
        assert!(nearby(&backend, 0, 0.0, 0.0, 5.0).is_empty());
        backend.update(0, 49.0, 49.0);
        assert_eq!(nearby(&backend, 0, 49.0, 49.0, 5.0), vec![1]);
    }

    #[test]
    fn remove_drops_from_both_lists() {
        let mut backend = CrosslinkBackend::new(100.0, 100.0, 5.0);
        backend.insert(0, 10.0, 10.0);
        backend.insert(1, 11.0, 11.0);
        backend.remove(1);
        assert!(nearby(&backend, 0, 10.0, 10.0, 5.0).is_empty());
    }

    #[test]
    fn tie_on_one_axis_still_excludes_self() {
        let mut backend = CrosslinkBackend::new(100.0, 100.0, 5.0);
        backend.insert(0, 10.0, 10.0);
        backend.insert(1, 10.0, 12.0);
        assert_eq!(nearby(&backend, 0, 10.0, 10.0, 5.0), vec![1]);
    }
}
