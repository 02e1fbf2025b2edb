// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vectordc: an integer-pixel device context on a vector backend.
//!
//! Toolkit drawing code is written against a classic device context: pixel
//! coordinates, angles in 1/64 degree, foreground and background colors,
//! dash lists, tiles and stipples, one-bit clip masks, bitmaps and icons.
//! [`VectorDc`] accepts exactly that and turns it into paths, sources and
//! surfaces on any [`VectorBackend`].
//!
//! The pieces:
//! - Session management: [`VectorDc::begin`] wraps a [`Drawable`] in a
//!   backend surface and context, [`VectorDc::end`] releases everything the
//!   session created.
//! - Path emulation: integer primitives become backend paths. Thin strokes
//!   are nudged by half a pixel so they land on pixel centers.
//! - Paint resolution: pen and brush state is kept abstractly and pushed to
//!   the backend only when a paint needs it and it differs from what the
//!   backend already has.
//! - Pixel conversion: client bitmaps, images and icon masks are converted
//!   to backend surface formats; see [`convert`].
//! - Text: a [`TextEngine`](vectordc_backend::TextEngine) lays out and draws
//!   strings in the selected [`FontDescriptor`].
//!
//! ## Example
//!
//! ```
//! use vectordc::{Color, DeviceContext, VectorDc, Window};
//! use vectordc_backend::{DrawOp, DrawableId};
//! use vectordc_backend_ref::RefBackend;
//!
//! let mut backend = RefBackend::new();
//! let window = Window::new(DrawableId(1), 200, 100);
//! {
//!     let mut dc = VectorDc::new(&mut backend);
//!     dc.begin(&window)?;
//!     dc.set_foreground(Color::rgb(200, 0, 0))?;
//!     dc.fill_rectangle(10, 10, 50, 20)?;
//!     dc.draw_line(0, 0, 199, 99)?;
//!     dc.end();
//! }
//!
//! let draws: Vec<_> = backend.draws().map(|(op, _, _)| *op).collect();
//! assert_eq!(
//!     draws,
//!     [DrawOp::Fill { preserve: false }, DrawOp::Stroke { preserve: false }]
//! );
//! assert_eq!(backend.live_surfaces(), 0);
//! # Ok::<(), vectordc::DcError>(())
//! ```

mod config;
pub mod convert;
mod dash;
mod dc;
mod device;
mod drawable;
mod error;
mod font;
mod icon;
pub mod mapping;
mod paint;
mod session;
mod state;
pub mod stipple;
mod types;

pub use config::DcConfig;
pub use dash::{DashPattern, MAX_DASHES};
pub use dc::VectorDc;
pub use device::{DeviceContext, FULL_CIRCLE};
pub use drawable::{
    ClientBitmap, ClientImage, Drawable, ImageOptions, MemoryBitmap, MemoryImage, Window,
};
pub use error::DcError;
pub use font::{FontDescriptor, SetWidth, Slant};
pub use icon::IconMode;
pub use types::{
    Arc, CapStyle, Color, FillRule, FillStyle, Function, JoinStyle, LineStyle, Point, Rectangle,
    Segment, StipplePattern,
};
