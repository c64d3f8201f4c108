// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A spatial index for area-of-interest (AOI) tracking: given a set of
//! moving points inside a bounded 2D world and a visibility radius, report
//! which points can currently see which, and fire callbacks exactly when
//! that changes.
//!
//! Three interchangeable spatial backends are provided, selected at
//! construction and otherwise invisible to the caller:
//!
//! - [`backends::CrosslinkBackend`] — two cross-linked skiplists, one per
//!   axis. No spatial partitioning of its own; good for uneven clustering.
//! - [`backends::QuadtreeBackend`] — a capacity-split point quadtree with a
//!   bounded split depth. Adapts to density, good when units are unevenly
//!   spread.
//! - [`backends::TowerBackend`] — a dense uniform grid, cell size fixed to
//!   the configured visibility radius. Cheapest when density is roughly
//!   even and the radius doesn't change.
//!
//! All three backends produce identical enter/leave callback sequences for
//! the same sequence of operations; only their internal cost characteristics
//! differ. "Nearby" is Chebyshev distance: two points are visible to each
//! other when `max(|dx|, |dy|) <= r`, boundary included.
//!
//! ```
//! use aoi_index::AoiIndex;
//!
//! let mut index = AoiIndex::with_tower(
//!     100.0, 100.0, 5.0,
//!     |observer, observed| println!("{observer} now sees {observed}"),
//!     |observer, observed| println!("{observer} lost sight of {observed}"),
//! ).unwrap();
//!
//! index.add_unit(1, 10.0, 10.0).unwrap();
//! index.add_unit(2, 12.0, 12.0).unwrap(); // prints both directions of "sees"
//! index.update_unit(2, 90.0, 90.0).unwrap(); // prints both directions of "lost sight of"
//! ```
//!
//! # Concurrency
//!
//! An [`AoiIndex`] is single-threaded and non-reentrant: calling back into
//! the same index from inside an `on_enter`/`on_leave` callback (for
//! instance, adding or removing a unit in response to an enter event) is a
//! logic error. Buffer such requests and apply them after the triggering
//! call returns.
#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod backend;
mod backends;
mod delta;
mod error;
mod index;
mod rng;
mod skiplist;
mod unit;

pub use backend::Backend;
pub use backends::{CrosslinkBackend, QuadtreeBackend, TowerBackend};
pub use error::AoiError;
pub use index::AoiIndex;
pub use rng::{LevelRng, SplitMix64};
pub use unit::UnitId;
