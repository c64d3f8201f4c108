// Copyright 2026 the aoi_index Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The crate's single error type.
//!
//! Every condition here is a programmer contract violation (see the crate's
//! design notes): a bad call never corrupts index state, it is simply
//! rejected before any mutation is applied.

use core::fmt;

use crate::UnitId;

/// All ways a caller can violate this crate's contract.
///
/// No variant here can arise from data the index itself produced; each one
/// traces back to an argument the caller supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum AoiError {
    /// `width`, `height`, or `r` was negative at construction time.
    InvalidConfig {
        /// The world width that was supplied.
        width: f32,
        /// The world height that was supplied.
        height: f32,
        /// The visibility radius that was supplied.
        r: f32,
    },
    /// A position fell outside `[0, width] x [0, height]`.
    OutOfBounds {
        /// The unit id the caller was trying to place.
        id: UnitId,
        /// The rejected x coordinate.
        x: f32,
        /// The rejected y coordinate.
        y: f32,
    },
    /// `add_unit` was called with an id already present in the index.
    DuplicateId {
        /// The id that already exists.
        id: UnitId,
    },
    /// `update_unit`, `remove_unit`, or a query named an id not present.
    UnknownId {
        /// The id that could not be found.
        id: UnitId,
    },
}

impl fmt::Display for AoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidConfig { width, height, r } => write!(
                f,
                "invalid config: width={width}, height={height}, r={r} (all must be >= 0)"
            ),
            Self::OutOfBounds { id, x, y } => {
                write!(f, "unit {id} position ({x}, {y}) is outside the world bounds")
            }
            Self::DuplicateId { id } => write!(f, "unit {id} already exists"),
            Self::UnknownId { id } => write!(f, "unit {id} is not present in the index"),
        }
    }
}

impl core::error::Error for AoiError {}
