// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The public facade: a backend-generic area-of-interest index over
//! caller-assigned ids.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::backend::Backend;
use crate::backends::{CrosslinkBackend, QuadtreeBackend, TowerBackend};
use crate::error::AoiError;
use crate::unit::Entry;
use crate::{delta, UnitId};

type EnterCallback = Box<dyn FnMut(UnitId, UnitId)>;
type LeaveCallback = Box<dyn FnMut(UnitId, UnitId)>;

/// An area-of-interest index: tracks a set of 2D points inside a bounded
/// world and fires `on_enter`/`on_leave` callbacks as points move in and out
/// of each other's visibility radius.
///
/// `B` selects the spatial structure underneath; see [`CrosslinkBackend`],
/// [`QuadtreeBackend`] and [`TowerBackend`], or use the [`AoiIndex::with_crosslink`],
/// [`AoiIndex::with_quadtree`] and [`AoiIndex::with_tower`] constructors to
/// avoid naming the backend type at all.
///
/// This type is not reentrant: calling back into the same index from inside
/// `on_enter`/`on_leave` is a logic error (see the crate-level docs).
pub struct AoiIndex<B: Backend> {
    width: f32,
    height: f32,
    r: f32,
    entries: Vec<Option<Entry>>,
    free: Vec<usize>,
    id_to_slot: HashMap<UnitId, usize>,
    backend: B,
    on_enter: EnterCallback,
    on_leave: LeaveCallback,
}

impl<B: Backend> core::fmt::Debug for AoiIndex<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AoiIndex")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("r", &self.r)
            .field("unit_count", &self.id_to_slot.len())
            .finish_non_exhaustive()
    }
}

impl<B: Backend> AoiIndex<B> {
    /// Builds a new index over a `width x height` world with visibility
    /// radius `r`. `on_enter(observer, observed)` fires when `observed`
    /// becomes visible to `observer`; `on_leave` fires symmetrically.
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::InvalidConfig`] if `width`, `height`, or `r` is
    /// negative.
    pub fn new(
        width: f32,
        height: f32,
        r: f32,
        on_enter: impl FnMut(UnitId, UnitId) + 'static,
        on_leave: impl FnMut(UnitId, UnitId) + 'static,
    ) -> Result<Self, AoiError> {
        if width < 0.0 || height < 0.0 || r < 0.0 {
            return Err(AoiError::InvalidConfig { width, height, r });
        }
        Ok(Self {
            width,
            height,
            r,
            entries: Vec::new(),
            free: Vec::new(),
            id_to_slot: HashMap::new(),
            backend: B::new(width, height, r),
            on_enter: Box::new(on_enter),
            on_leave: Box::new(on_leave),
        })
    }

    /// The world width this index was built with.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// The world height this index was built with.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The configured visibility radius.
    #[must_use]
    pub fn r(&self) -> f32 {
        self.r
    }

    /// Iterates the ids of every unit currently tracked. No particular
    /// order is guaranteed.
    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.entries.iter().filter_map(|e| e.as_ref().map(|e| e.id))
    }

    fn validate_position(&self, id: UnitId, x: f32, y: f32) -> Result<(), AoiError> {
        if x < 0.0 || x > self.width || y < 0.0 || y > self.height {
            return Err(AoiError::OutOfBounds { id, x, y });
        }
        Ok(())
    }

    fn alloc_slot(&mut self, entry: Entry) -> usize {
        if let Some(slot) = self.free.pop() {
            self.entries[slot] = Some(entry);
            slot
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        }
    }

    fn candidates(&self, slot: usize, x: f32, y: f32, range: f32) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        self.backend.visit_candidates(slot, x, y, range, |candidate| {
            if candidate == slot {
                return;
            }
            if let Some(other) = self.entries[candidate].as_ref() {
                if (other.x - x).abs() <= range && (other.y - y).abs() <= range {
                    out.insert(candidate);
                }
            }
        });
        out
    }

    /// Adds a new unit at `(x, y)`, firing `on_enter` for every already
    /// tracked unit now within range, on both sides of each pair.
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::DuplicateId`] if `id` is already tracked, or
    /// [`AoiError::OutOfBounds`] if the position is outside the world.
    pub fn add_unit(&mut self, id: UnitId, x: f32, y: f32) -> Result<(), AoiError> {
        if self.id_to_slot.contains_key(&id) {
            return Err(AoiError::DuplicateId { id });
        }
        self.validate_position(id, x, y)?;

        let slot = self.alloc_slot(Entry::new(id, x, y));
        self.id_to_slot.insert(id, slot);
        self.backend.insert(slot, x, y);

        let new_set = self.candidates(slot, x, y, self.r);
        delta::apply_delta(
            &mut self.entries,
            slot,
            new_set,
            &mut *self.on_enter,
            &mut *self.on_leave,
        );
        Ok(())
    }

    /// Moves an already tracked unit to `(x, y)`, firing `on_enter`/
    /// `on_leave` for whatever changed. Moving to the unit's current
    /// position is a no-op: no backend mutation, no callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::UnknownId`] if `id` is not tracked, or
    /// [`AoiError::OutOfBounds`] if the position is outside the world.
    pub fn update_unit(&mut self, id: UnitId, x: f32, y: f32) -> Result<(), AoiError> {
        let slot = *self.id_to_slot.get(&id).ok_or(AoiError::UnknownId { id })?;
        self.validate_position(id, x, y)?;

        let entry = self.entries[slot].as_ref().expect("live slot");
        if entry.x == x && entry.y == y {
            return Ok(());
        }

        self.backend.update(slot, x, y);
        {
            let entry = self.entries[slot].as_mut().expect("live slot");
            entry.x = x;
            entry.y = y;
        }

        let new_set = self.candidates(slot, x, y, self.r);
        delta::apply_delta(
            &mut self.entries,
            slot,
            new_set,
            &mut *self.on_enter,
            &mut *self.on_leave,
        );
        Ok(())
    }

    /// Removes a tracked unit, firing `on_leave` for every remaining
    /// subscriber on both sides, then releasing its storage.
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::UnknownId`] if `id` is not tracked.
    pub fn remove_unit(&mut self, id: UnitId) -> Result<(), AoiError> {
        let slot = self
            .id_to_slot
            .remove(&id)
            .ok_or(AoiError::UnknownId { id })?;
        self.backend.remove(slot);

        delta::apply_delta(
            &mut self.entries,
            slot,
            BTreeSet::new(),
            &mut *self.on_enter,
            &mut *self.on_leave,
        );

        self.entries[slot] = None;
        self.free.push(slot);
        Ok(())
    }

    /// Returns every tracked unit within `range` (Chebyshev) of `id`'s
    /// current position, excluding `id` itself. `range` need not match the
    /// index's configured visibility radius.
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::UnknownId`] if `id` is not tracked.
    pub fn find_nearby_unit(&self, id: UnitId, range: f32) -> Result<Vec<UnitId>, AoiError> {
        let slot = *self.id_to_slot.get(&id).ok_or(AoiError::UnknownId { id })?;
        let entry = self.entries[slot].as_ref().expect("live slot");
        let (x, y) = (entry.x, entry.y);
        let slots = self.candidates(slot, x, y, range);
        Ok(slots
            .into_iter()
            .map(|s| self.entries[s].as_ref().expect("live slot").id)
            .collect())
    }

    /// Returns the current subscriber set of `id`: every unit that would
    /// receive an `on_leave` if `id` were removed right now.
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::UnknownId`] if `id` is not tracked.
    pub fn get_subscribe_set(&self, id: UnitId) -> Result<Vec<UnitId>, AoiError> {
        let slot = *self.id_to_slot.get(&id).ok_or(AoiError::UnknownId { id })?;
        let entry = self.entries[slot].as_ref().expect("live slot");
        Ok(entry
            .subscribers
            .iter()
            .map(|&s| self.entries[s].as_ref().expect("live slot").id)
            .collect())
    }
}

impl AoiIndex<CrosslinkBackend> {
    /// Builds an index backed by two cross-linked ordered lists (one per
    /// axis). Favors worlds where units cluster unevenly, since it does no
    /// spatial partitioning of its own.
    ///
    /// # Errors
    ///
    /// See [`AoiIndex::new`].
    pub fn with_crosslink(
        width: f32,
        height: f32,
        r: f32,
        on_enter: impl FnMut(UnitId, UnitId) + 'static,
        on_leave: impl FnMut(UnitId, UnitId) + 'static,
    ) -> Result<Self, AoiError> {
        Self::new(width, height, r, on_enter, on_leave)
    }
}

impl AoiIndex<QuadtreeBackend> {
    /// Builds an index backed by a capacity-split quadtree. Favors worlds
    /// with uneven density, since it only subdivides where units actually
    /// are.
    ///
    /// # Errors
    ///
    /// See [`AoiIndex::new`].
    pub fn with_quadtree(
        width: f32,
        height: f32,
        r: f32,
        on_enter: impl FnMut(UnitId, UnitId) + 'static,
        on_leave: impl FnMut(UnitId, UnitId) + 'static,
    ) -> Result<Self, AoiError> {
        Self::new(width, height, r, on_enter, on_leave)
    }
}

impl AoiIndex<TowerBackend> {
    /// Builds an index backed by a dense uniform grid, cell size `r`.
    /// Favors worlds with roughly even density and a visibility radius that
    /// stays fixed across the index's lifetime.
    ///
    /// # Errors
    ///
    /// See [`AoiIndex::new`].
    pub fn with_tower(
        width: f32,
        height: f32,
        r: f32,
        on_enter: impl FnMut(UnitId, UnitId) + 'static,
        on_leave: impl FnMut(UnitId, UnitId) + 'static,
    ) -> Result<Self, AoiError> {
        Self::new(width, height, r, on_enter, on_leave)
    }
}
