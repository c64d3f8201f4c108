// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns an old and a new neighbor set into enter/leave callbacks, shared by
//! every operation on every backend.
//!
//! For each neighbor that is newly in range, both sides learn about the
//! other: the neighbor is told the moving unit entered, and the moving unit
//! is told the neighbor entered, each getting the pair in `(self, other)`
//! order. Leaves are symmetric. A unit's own subscriber set is kept in sync
//! as each pair fires, then pinned to exactly `new_set` at the end so it can
//! never drift from what the backend actually reports.

use alloc::collections::BTreeSet;

use crate::unit::Entry;
use crate::UnitId;

/// Applies the delta between `entries[slot].subscribers` and `new_set`,
/// firing `on_enter`/`on_leave` for every pair that changed and leaving
/// `entries[slot].subscribers == new_set` when done.
///
/// `slot` must name a live entry; every slot reachable from `new_set` (and
/// every slot still in the old subscriber set) must also be live.
pub(crate) fn apply_delta(
    entries: &mut [Option<Entry>],
    slot: usize,
    new_set: BTreeSet<usize>,
    on_enter: &mut dyn FnMut(UnitId, UnitId),
    on_leave: &mut dyn FnMut(UnitId, UnitId),
) {
    let old_set = core::mem::take(
        &mut entries[slot]
            .as_mut()
            .expect("live slot")
            .subscribers,
    );

    let self_id = entries[slot].as_ref().expect("live slot").id;

    for other in new_set.difference(&old_set) {
        let other_id = entries[*other].as_ref().expect("live neighbor").id;
        on_enter(other_id, self_id);
        on_enter(self_id, other_id);
        entries[*other]
            .as_mut()
            .expect("live neighbor")
            .subscribers
            .insert(slot);
    }

    for other in old_set.difference(&new_set) {
        let other_id = entries[*other].as_ref().expect("live neighbor").id;
        on_leave(other_id, self_id);
        on_leave(self_id, other_id);
        entries[*other]
            .as_mut()
            .expect("live neighbor")
            .subscribers
            .remove(&slot);
    }

    entries[slot].as_mut().expect("live slot").subscribers = new_set;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn make(entries: &mut Vec<Option<Entry>>, id: UnitId, x: f32, y: f32) -> usize {
        entries.push(Some(Entry::new(id, x, y)));
        entries.len() - 1
    }

    #[test]
    fn enter_and_leave_fire_symmetric_pairs() {
        let mut entries = Vec::new();
        let a = make(&mut entries, 100, 0.0, 0.0);
        let b = make(&mut entries, 200, 1.0, 1.0);
        let mut log: Vec<(UnitId, UnitId)> = Vec::new();

        let mut new_set = BTreeSet::new();
        new_set.insert(b);
        apply_delta(
            &mut entries,
            a,
            new_set,
            &mut |x, y| log.push((x, y)),
            &mut |_, _| panic!("no leaves expected"),
        );
        assert_eq!(log, alloc::vec![(200, 100), (100, 200)]);
        assert!(entries[a].as_ref().unwrap().subscribers.contains(&b));
        assert!(entries[b].as_ref().unwrap().subscribers.contains(&a));

        log.clear();
        apply_delta(
            &mut entries,
            a,
            BTreeSet::new(),
            &mut |_, _| panic!("no enters expected"),
            &mut |x, y| log.push((x, y)),
        );
        assert_eq!(log, alloc::vec![(200, 100), (100, 200)]);
        assert!(entries[a].as_ref().unwrap().subscribers.is_empty());
        assert!(entries[b].as_ref().unwrap().subscribers.is_empty());
    }

    #[test]
    fn identical_set_fires_nothing() {
        let mut entries = Vec::new();
        let a = make(&mut entries, 1, 0.0, 0.0);
        let b = make(&mut entries, 2, 1.0, 1.0);
        let mut set = BTreeSet::new();
        set.insert(b);
        apply_delta(
            &mut entries,
            a,
            set.clone(),
            &mut |_, _| panic!("unexpected enter"),
            &mut |_, _| panic!("unexpected leave"),
        );
        apply_delta(
            &mut entries,
            a,
            set,
            &mut |_, _| panic!("unexpected enter"),
            &mut |_, _| panic!("unexpected leave"),
        );
    }
}
