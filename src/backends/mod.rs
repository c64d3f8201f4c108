// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three concrete [`crate::Backend`] implementations.

mod crosslink;
mod quadtree;
mod tower;

pub use crosslink::CrosslinkBackend;
pub use quadtree::QuadtreeBackend;
pub use tower::TowerBackend;
