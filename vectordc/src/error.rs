// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vectordc_backend::BackendError;

/// Errors reported by [`VectorDc`](crate::VectorDc).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DcError {
    /// The drawable has not been realized on the server side.
    #[error("drawable has no server-side identity")]
    InvalidDrawable,
    /// A drawing operation was issued outside a painting session.
    #[error("device context is not bound to a drawable")]
    SessionNotBound,
    /// A source's client pixels could not be obtained, even after fetching
    /// them back from the server.
    #[error("source pixels are not available")]
    UnsupportedSource,
    /// A text operation was issued before a font was set.
    #[error("no font selected")]
    NoFont,
    /// A text operation was issued on a context without a text engine.
    #[error("no text engine attached")]
    NoTextEngine,
    /// The backend cannot read pixels back.
    #[error("backend does not support pixel read-back")]
    ReadbackUnsupported,
    /// The backend rejected an operation.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
