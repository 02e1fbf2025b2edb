// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vectordc Backend: the boundary between the device context and a vector canvas.
//!
//! The device context speaks an immediate-mode, integer-pixel API. Backends speak
//! a path-based, floating-point, stateful one. This crate defines the latter:
//!
//! - **Resources**: opaque handles ([`SurfaceId`], [`ContextId`]) whose lifetimes
//!   are managed via [`ResourceBackend`]. Drawables owned by the windowing side
//!   are named by [`DrawableId`].
//! - **Operations**: [`PathOp`] builds the current path in the current transform,
//!   [`StateOp`] mutates the graphics state, and [`DrawOp`] produces pixels.
//! - **Backends**: [`VectorBackend`] accepts operations for one active context at
//!   a time and answers the few queries the device context needs (current
//!   transform, device/user conversions, optional pixel read-back).
//! - **Text**: [`TextEngine`] and [`TextLayout`] describe the layout engine the
//!   device context drives; [`FontDescription`] is the backend font description.
//!
//! The model follows the classic save/restore canvas: geometry is transformed as
//! it is added to the path, [`StateOp::Save`] and [`StateOp::Restore`] bracket
//! the whole graphics state including the clip, and a source pattern is
//! interpreted in the user space that was current when it was set.
//!
//! [`PathBuilder`] implements the path half of that model in device space so
//! that backends share one definition of arcs, rectangles and sub-path rules.

mod error;
mod path;
mod text;

pub use error::BackendError;
pub use path::{PathBuilder, arc_sweep};
pub use text::{FontDescription, FontStretch, FontStyle, TextEngine, TextLayout};

pub use kurbo::{Affine, BezPath, Cap, Dashes, Join, Point, Rect, Vec2};
pub use peniko::{BlendMode, Color, Compose, Extend, Fill as FillRule, Mix};

/// Identifier for a backend surface.
///
/// Surfaces are pixel stores: the drawing target of a context, tile and
/// stipple sources, clip masks, icon masks.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Identifier for a drawing context created over a surface.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(pub u32);

/// Server-side identity of a realized drawable (window, image, bitmap, icon).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub u64);

/// Pixel format of a client-supplied surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    /// One bit of alpha per pixel, least significant bit first within a byte.
    A1,
    /// Eight bits of alpha per pixel.
    A8,
    /// 32-bit premultiplied ARGB, stored as little-endian `u32`
    /// (`a << 24 | r << 16 | g << 8 | b`).
    Argb32,
}

impl SurfaceFormat {
    /// Bits used by one pixel.
    #[inline]
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::A1 => 1,
            Self::A8 => 8,
            Self::Argb32 => 32,
        }
    }

    /// Row stride in bytes for a surface of `width` pixels.
    ///
    /// Rows are padded to a multiple of four bytes.
    #[inline]
    pub const fn stride_for_width(self, width: u32) -> usize {
        let bits = width as usize * self.bits_per_pixel() as usize;
        bits.div_ceil(32) * 4
    }
}

/// Description of a client-supplied surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: SurfaceFormat,
    /// Bytes per row. At least [`SurfaceFormat::stride_for_width`].
    pub stride: usize,
}

impl SurfaceDesc {
    /// Create a descriptor using the natural stride for `format`.
    #[inline]
    pub const fn new(width: u32, height: u32, format: SurfaceFormat) -> Self {
        Self {
            width,
            height,
            format,
            stride: format.stride_for_width(width),
        }
    }

    /// Total bytes a buffer for this descriptor must hold.
    #[inline]
    pub const fn byte_len(&self) -> usize {
        self.stride * self.height as usize
    }
}

/// A surface used as a source pattern.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfacePattern {
    /// Surface supplying the pixels.
    pub surface: SurfaceId,
    /// Maps surface pixel space into the user space current when the source is set.
    pub transform: Affine,
    /// Behavior outside the surface bounds.
    pub extend: Extend,
}

impl SurfacePattern {
    /// Place `surface` with its top-left corner at `origin` in user space.
    #[inline]
    pub fn at(surface: SurfaceId, origin: Point) -> Self {
        Self {
            surface,
            transform: Affine::translate(origin.to_vec2()),
            extend: Extend::Pad,
        }
    }

    /// Return a copy with a different extend mode.
    #[inline]
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = extend;
        self
    }
}

/// Current source used by fills, strokes and masks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Source {
    /// A solid color.
    Solid(Color),
    /// A surface pattern.
    Surface(SurfacePattern),
}

/// Direction an arc sweeps in.
///
/// Angles grow from the positive x axis towards the positive y axis, so in a
/// y-down device space [`ArcDirection::Positive`] runs clockwise on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArcDirection {
    /// Increasing angles.
    Positive,
    /// Decreasing angles.
    Negative,
}

/// Path construction operations.
///
/// Coordinates are in user space and are transformed by the current transform
/// at the time the operation is applied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathOp {
    /// Discard the current path.
    NewPath,
    /// Start a new sub-path without a current point.
    ///
    /// A following [`PathOp::Arc`] begins with a move rather than a line.
    NewSubPath,
    /// Begin a sub-path at a point.
    MoveTo(Point),
    /// Straight line to a point. Acts as a move when there is no current point.
    LineTo(Point),
    /// Cubic Bézier segment.
    CurveTo(Point, Point, Point),
    /// Circular arc; connected to the current point by a line if one exists.
    Arc {
        /// Center of the arc.
        center: Point,
        /// Radius of the arc.
        radius: f64,
        /// Start angle in radians.
        start: f64,
        /// End angle in radians.
        end: f64,
        /// Sweep direction.
        direction: ArcDirection,
    },
    /// Closed axis-aligned rectangle sub-path.
    Rectangle(Rect),
    /// Close the current sub-path.
    ClosePath,
}

/// Parameters for a pushed compositing layer.
///
/// Drawing inside the layer goes to an isolated group. When the layer is popped
/// the group is composited into its parent, through `mask` if present.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct LayerOp {
    /// Optional alpha mask applied when compositing the group.
    pub mask: Option<MaskRef>,
    /// Optional blend mode used when compositing into the parent.
    pub blend: Option<BlendMode>,
    /// Optional opacity (0–1) applied when compositing into the parent.
    pub opacity: Option<f32>,
}

impl LayerOp {
    /// A layer that composites through `mask`.
    #[inline]
    pub fn masked(mask: MaskRef) -> Self {
        Self {
            mask: Some(mask),
            ..Self::default()
        }
    }

    /// Returns true if the layer changes how its contents reach the parent.
    #[inline]
    pub fn has_compositing_effects(&self) -> bool {
        self.mask.is_some() || self.blend.is_some() || self.opacity.is_some()
    }
}

/// An alpha mask surface placed in user space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MaskRef {
    /// Surface whose alpha channel is the mask.
    pub surface: SurfaceId,
    /// Position of the mask's top-left pixel in user space.
    pub origin: Point,
}

/// State operations that mutate the current graphics state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Push a copy of the graphics state (transform, source, stroke parameters,
    /// fill rule, blend mode, clip).
    Save,
    /// Pop the graphics state pushed by the matching [`StateOp::Save`].
    Restore,
    /// Concatenate a transform onto the current transform.
    Transform(Affine),
    /// Set the current source.
    SetSource(Source),
    /// Set the stroke width in user units.
    SetLineWidth(f64),
    /// Set the stroke cap.
    SetLineCap(Cap),
    /// Set the stroke join.
    SetLineJoin(Join),
    /// Set the dash pattern. An empty pattern disables dashing.
    SetDash {
        /// Alternating on/off lengths in user units.
        pattern: Dashes,
        /// Offset into the pattern at which strokes begin.
        offset: f64,
    },
    /// Set the fill rule used by fills and clips.
    SetFillRule(FillRule),
    /// Set the blend mode used by subsequent draws.
    SetBlendMode(BlendMode),
    /// Intersect the clip with the current path, then discard the path.
    Clip,
    /// Remove all clipping.
    ResetClip,
    /// Begin an isolated group. Implies [`StateOp::Save`].
    PushLayer(LayerOp),
    /// Composite the innermost group into its parent. Implies [`StateOp::Restore`].
    PopLayer,
}

/// Draw operations that produce pixels given the current state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the current path.
    Fill {
        /// Keep the path after filling.
        preserve: bool,
    },
    /// Stroke the current path.
    Stroke {
        /// Keep the path after stroking.
        preserve: bool,
    },
    /// Paint the current source everywhere inside the clip.
    Paint,
    /// Paint the current source through the alpha of a mask surface.
    Mask(MaskRef),
}

/// Resource lifetime interface.
///
/// Handles stay valid until the matching `destroy_*` call. Destroying an
/// unknown or already-destroyed handle is a no-op.
pub trait ResourceBackend {
    /// Create a surface from client pixels laid out per `desc`.
    fn create_surface(&mut self, desc: SurfaceDesc, data: &[u8])
    -> Result<SurfaceId, BackendError>;

    /// Create a surface bound to a realized drawable's server-side pixels.
    fn create_drawable_surface(
        &mut self,
        drawable: DrawableId,
        width: u32,
        height: u32,
    ) -> Result<SurfaceId, BackendError>;

    /// Destroy a surface.
    fn destroy_surface(&mut self, id: SurfaceId);
}

/// A vector canvas with one active drawing context at a time.
pub trait VectorBackend: ResourceBackend {
    /// Create a drawing context targeting `target`.
    ///
    /// The new context starts with an identity transform, an empty path, no
    /// clip, an opaque black source and default stroke parameters.
    fn create_context(&mut self, target: SurfaceId) -> Result<ContextId, BackendError>;

    /// Destroy a drawing context, flushing its drawing into the target.
    fn destroy_context(&mut self, id: ContextId);

    /// Apply a path operation.
    fn path(&mut self, op: PathOp);

    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// Current user-to-device transform.
    fn transform(&self) -> Affine;

    /// Convert a device-space distance vector to user space.
    fn device_to_user_distance(&self, v: Vec2) -> Vec2 {
        let inv = self.transform().inverse();
        let [a, b, c, d, _, _] = inv.as_coeffs();
        Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
    }

    /// Convert a user-space point to device space.
    fn user_to_device(&self, p: Point) -> Point {
        self.transform() * p
    }

    /// Read one device pixel of the current target, straight (not premultiplied) alpha.
    ///
    /// Backends that cannot read back return `None`.
    fn read_pixel(&mut self, _x: i32, _y: i32) -> Option<Color> {
        None
    }

    /// Equivalent to `self.state(StateOp::Save)`.
    #[inline]
    fn save(&mut self) {
        self.state(StateOp::Save);
    }

    /// Equivalent to `self.state(StateOp::Restore)`.
    #[inline]
    fn restore(&mut self) {
        self.state(StateOp::Restore);
    }

    /// Concatenate a translation onto the current transform.
    #[inline]
    fn translate(&mut self, v: Vec2) {
        self.state(StateOp::Transform(Affine::translate(v)));
    }

    /// Set a solid source color.
    #[inline]
    fn set_source_color(&mut self, color: Color) {
        self.state(StateOp::SetSource(Source::Solid(color)));
    }
}

/// Convenience helpers for [`VectorBackend`] callers.
///
/// Kept separate so that [`VectorBackend`] stays usable as a trait object.
pub trait VectorBackendExt: VectorBackend {
    /// Run `f` between a save and a restore.
    ///
    /// Note: if `f` panics, the state will not be restored.
    #[inline]
    fn with_saved<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let out = f(self);
        self.restore();
        out
    }

    /// Run `f` inside a pushed layer, popping it afterwards.
    ///
    /// Note: if `f` panics, the layer will not be popped.
    #[inline]
    fn with_layer<R>(&mut self, op: LayerOp, f: impl FnOnce(&mut Self) -> R) -> R {
        self.state(StateOp::PushLayer(op));
        let out = f(self);
        self.state(StateOp::PopLayer);
        out
    }
}

impl<B: VectorBackend + ?Sized> VectorBackendExt for B {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_pad_to_four_bytes() {
        assert_eq!(SurfaceFormat::A1.stride_for_width(1), 4);
        assert_eq!(SurfaceFormat::A1.stride_for_width(32), 4);
        assert_eq!(SurfaceFormat::A1.stride_for_width(33), 8);
        assert_eq!(SurfaceFormat::A8.stride_for_width(5), 8);
        assert_eq!(SurfaceFormat::Argb32.stride_for_width(3), 12);
        assert_eq!(SurfaceFormat::Argb32.stride_for_width(0), 0);
    }

    #[test]
    fn desc_byte_len_uses_stride() {
        let desc = SurfaceDesc::new(20, 20, SurfaceFormat::A1);
        assert_eq!(desc.stride, 4);
        assert_eq!(desc.byte_len(), 80);
    }

    #[test]
    fn surface_pattern_at_translates() {
        let p = SurfacePattern::at(SurfaceId(3), Point::new(5.0, -2.0));
        assert_eq!(p.transform * Point::ORIGIN, Point::new(5.0, -2.0));
        assert_eq!(p.extend, Extend::Pad);
        assert_eq!(p.with_extend(Extend::Repeat).extend, Extend::Repeat);
    }

    #[test]
    fn masked_layer_has_effects() {
        let layer = LayerOp::masked(MaskRef {
            surface: SurfaceId(1),
            origin: Point::ZERO,
        });
        assert!(layer.has_compositing_effects());
        assert!(!LayerOp::default().has_compositing_effects());
    }
}
