// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tower backend: a flat, dense `rows x cols` grid of cell buckets,
//! cell size fixed at the index's configured visibility radius `R`.
//!
//! A query with an arbitrary range scans a square window of cells around
//! the query point, sized to guarantee no false negative: `span =
//! ceil(range / R)` cells in each direction. The window is itself a
//! superset of the exact Chebyshev neighborhood (cells, not points), so
//! candidates this backend yields can include points outside `range` near
//! a cell's far edge; the facade applies the exact filter.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::backend::Backend;

type Bucket = SmallVec<[usize; 8]>;

/// [`Backend`] built from a dense uniform grid of cell buckets.
pub struct TowerBackend {
    r: f32,
    rows: usize,
    cols: usize,
    cells: Vec<Bucket>,
    cell_of: Vec<Option<(usize, usize)>>,
}

impl core::fmt::Debug for TowerBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TowerBackend")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("r", &self.r)
            .finish()
    }
}

impl TowerBackend {
    fn cell_for(&self, x: f32, y: f32) -> (usize, usize) {
        let row = ((y / self.r) as usize).min(self.rows - 1);
        let col = ((x / self.r) as usize).min(self.cols - 1);
        (row, col)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn remove_from_bucket(&mut self, slot: usize, row: usize, col: usize) {
        let idx = self.index(row, col);
        let bucket = &mut self.cells[idx];
        if let Some(pos) = bucket.iter().position(|&s| s == slot) {
            bucket.swap_remove(pos);
        }
    }

    fn ensure_capacity(&mut self, slot: usize) {
        if slot >= self.cell_of.len() {
            self.cell_of.resize(slot + 1, None);
        }
    }
}

impl Backend for TowerBackend {
    fn new(width: f32, height: f32, r: f32) -> Self {
        let r_eff = if r > 0.0 { r } else { 1.0 };
        let rows = ((height / r_eff).ceil() as usize).max(1);
        let cols = ((width / r_eff).ceil() as usize).max(1);
        Self {
            r: r_eff,
            rows,
            cols,
            cells: alloc::vec![Bucket::new(); rows * cols],
            cell_of: Vec::new(),
        }
    }

    fn insert(&mut self, slot: usize, x: f32, y: f32) {
        self.ensure_capacity(slot);
        let (row, col) = self.cell_for(x, y);
        let idx = self.index(row, col);
        self.cells[idx].push(slot);
        self.cell_of[slot] = Some((row, col));
    }

    fn update(&mut self, slot: usize, x: f32, y: f32) {
        let (old_row, old_col) = self.cell_of[slot].expect("slot must be tracked");
        let (new_row, new_col) = self.cell_for(x, y);
        if (old_row, old_col) == (new_row, new_col) {
            return;
        }
        self.remove_from_bucket(slot, old_row, old_col);
        let idx = self.index(new_row, new_col);
        self.cells[idx].push(slot);
        self.cell_of[slot] = Some((new_row, new_col));
    }

    fn remove(&mut self, slot: usize) {
        let (row, col) = self.cell_of[slot].take().expect("slot must be tracked");
        self.remove_from_bucket(slot, row, col);
    }

    fn visit_candidates<F: FnMut(usize)>(&self, slot: usize, x: f32, y: f32, range: f32, mut f: F) {
        let (row, col) = self.cell_for(x, y);
        let span = (range / self.r).ceil() as usize;
        let row_start = row.saturating_sub(span);
        let row_end = (row + span).min(self.rows - 1);
        let col_start = col.saturating_sub(span);
        let col_end = (col + span).min(self.cols - 1);
        for r in row_start..=row_end {
            for c in col_start..=col_end {
                let idx = self.index(r, c);
                for &candidate in &self.cells[idx] {
                    if candidate != slot {
                        f(candidate);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn nearby(
        backend: &TowerBackend,
        positions: &[(f32, f32)],
        slot: usize,
        range: f32,
    ) -> Vec<usize> {
        let (x, y) = positions[slot];
        let mut out = Vec::new();
        backend.visit_candidates(slot, x, y, range, |s| {
            let (ox, oy) = positions[s];
            if (ox - x).abs() <= range && (oy - y).abs() <= range {
                out.push(s);
            }
        });
        out.sort_unstable();
        out
    }

    #[test]
    fn finds_units_within_range_across_cells() {
        let mut backend = TowerBackend::new(100.0, 100.0, 5.0);
        let positions = [(10.0, 10.0), (13.0, 13.0), (50.0, 50.0)];
        for (i, &(x, y)) in positions.iter().enumerate() {
            backend.insert(i, x, y);
        }
        assert_eq!(nearby(&backend, &positions, 0, 5.0), alloc::vec![1]);
        assert_eq!(nearby(&backend, &positions, 0, 50.0), alloc::vec![1, 2]);
    }

    #[test]
    fn update_moves_bucket_when_cell_changes() {
        let mut backend = TowerBackend::new(100.0, 100.0, 5.0);
        let mut positions = [(1.0, 1.0), (50.0, 50.0)];
        backend.insert(0, positions[0].0, positions[0].1);
        backend.insert(1, positions[1].0, positions[1].1);
        assert!(nearby(&backend, &positions, 0, 5.0).is_empty());
        positions[0] = (49.0, 49.0);
        backend.update(0, positions[0].0, positions[0].1);
        assert_eq!(nearby(&backend, &positions, 0, 5.0), alloc::vec![1]);
    }

    #[test]
    fn update_within_same_cell_is_a_no_op_on_buckets() {
        let mut backend = TowerBackend::new(100.0, 100.0, 5.0);
        backend.insert(0, 1.0, 1.0);
        let idx_before = backend.cell_of[0];
        backend.update(0, 1.5, 1.2);
        assert_eq!(backend.cell_of[0], idx_before);
    }

    #[test]
    fn remove_clears_bucket_membership() {
        let mut backend = TowerBackend::new(100.0, 100.0, 5.0);
        let positions = [(1.0, 1.0), (2.0, 2.0)];
        backend.insert(0, positions[0].0, positions[0].1);
        backend.insert(1, positions[1].0, positions[1].1);
        backend.remove(1);
        assert!(nearby(&backend, &positions, 0, 5.0).is_empty());
    }

    #[test]
    fn zero_radius_does_not_divide_by_zero() {
        let mut backend = TowerBackend::new(10.0, 10.0, 0.0);
        backend.insert(0, 1.0, 1.0);
        backend.insert(1, 1.0, 1.0);
        let positions = [(1.0, 1.0), (1.0, 1.0)];
        assert_eq!(nearby(&backend, &positions, 0, 0.0), alloc::vec![1]);
    }
}
