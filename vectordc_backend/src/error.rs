// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{DrawableId, SurfaceId};

/// Errors reported by a backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// A surface handle was used after it was destroyed, or never existed.
    #[error("unknown surface {0:?}")]
    UnknownSurface(SurfaceId),
    /// The backend has no server-side storage for the given drawable.
    #[error("drawable {0:?} is not known to the backend")]
    UnknownDrawable(DrawableId),
    /// A drawing context is already active on this backend.
    #[error("a drawing context is already active")]
    ContextBusy,
    /// The operation needs an active drawing context.
    #[error("no drawing context is active")]
    NoContext,
    /// Surface bytes do not match the descriptor.
    #[error("surface data is {actual} bytes, expected {expected}")]
    DataSize {
        /// Bytes required by the descriptor.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// The surface dimensions exceed what the backend can allocate.
    #[error("surface of {width}x{height} exceeds backend limits")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// No loaded font face matches the requested family.
    #[error("no loaded face matches family {0:?}")]
    NoMatchingFace(String),
    /// Font data could not be parsed.
    #[error("font data could not be parsed")]
    InvalidFont,
}
