// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The caller-facing identity of a tracked point, and the bookkeeping the
//! facade keeps per slot.

use alloc::collections::BTreeSet;

/// A caller-assigned identifier for a tracked point.
///
/// Ids are never generated by this crate; callers choose them and must keep
/// them unique among currently-tracked units (see [`crate::AoiError::DuplicateId`]).
pub type UnitId = i64;

/// Everything the facade keeps about one live unit, indexed by arena slot.
///
/// `subscribers` is keyed by slot rather than [`UnitId`] so the delta engine
/// never has to hash; it is translated back to ids only at the public API
/// boundary. A [`alloc::collections::BTreeSet`] keeps its iteration order a
/// pure function of slot number, which is what makes the enter/leave
/// callback order reproducible across runs of the same backend.
pub(crate) struct Entry {
    pub(crate) id: UnitId,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) subscribers: BTreeSet<usize>,
}

impl Entry {
    pub(crate) fn new(id: UnitId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            subscribers: BTreeSet::new(),
        }
    }
}
