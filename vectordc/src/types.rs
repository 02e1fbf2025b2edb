// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client-facing value types of the device context.

/// A straight-alpha RGBA color with 8 bits per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// A color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as premultiplied 32-bit ARGB (`a << 24 | r << 16 | g << 8 | b`).
    ///
    /// Each color channel becomes `(a * c + 128) / 255`, which is
    /// `round(a * c / 255)`.
    #[inline]
    pub const fn to_premultiplied_argb32(self) -> u32 {
        let a = self.a as u32;
        let r = (a * self.r as u32 + 128) / 255;
        let g = (a * self.g as u32 + 128) / 255;
        let b = (a * self.b as u32 + 128) / 255;
        a << 24 | r << 16 | g << 8 | b
    }

    /// Unpack premultiplied 32-bit ARGB, rounding each channel to nearest.
    ///
    /// Fully transparent input yields [`Color::TRANSPARENT`].
    pub fn from_premultiplied_argb32(argb: u32) -> Self {
        let [b, g, r, a] = argb.to_le_bytes();
        if a == 0 {
            return Self::TRANSPARENT;
        }
        let unpremultiply = |c: u8| -> u8 {
            let a = u32::from(a);
            let v = (u32::from(c) * 255 + a / 2) / a;
            u8::try_from(v.min(255)).unwrap_or(u8::MAX)
        };
        Self::rgba(unpremultiply(r), unpremultiply(g), unpremultiply(b), a)
    }

    /// NTSC luma, `0.3 R + 0.59 G + 0.11 B`, on the 0 to 255 scale.
    #[inline]
    pub fn luma(self) -> f64 {
        f64::from(self.r) * 0.3 + f64::from(self.g) * 0.59 + f64::from(self.b) * 0.11
    }

    /// The same color with its alpha replaced by `alpha` (0 to 1) for the backend.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> peniko::Color {
        peniko::Color::from_rgba8(self.r, self.g, self.b, 255).with_alpha(alpha)
    }
}

impl From<Color> for peniko::Color {
    #[inline]
    fn from(c: Color) -> Self {
        Self::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

impl From<peniko::Color> for Color {
    #[inline]
    fn from(c: peniko::Color) -> Self {
        let c = c.to_rgba8();
        Self::rgba(c.r, c.g, c.b, c.a)
    }
}

/// A point with 16-bit coordinates, as carried by point lists.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i16,
    /// Vertical coordinate.
    pub y: i16,
}

impl Point {
    /// Create a point.
    #[inline]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Start x.
    pub x1: i16,
    /// Start y.
    pub y1: i16,
    /// End x.
    pub x2: i16,
    /// End y.
    pub y2: i16,
}

/// An axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// Left edge.
    pub x: i16,
    /// Top edge.
    pub y: i16,
    /// Width.
    pub w: i16,
    /// Height.
    pub h: i16,
}

impl Rectangle {
    /// Create a rectangle.
    #[inline]
    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self { x, y, w, h }
    }
}

/// An elliptical arc inscribed in a bounding box.
///
/// Angles are in 1/64 degree; `a` is the start angle measured
/// counter-clockwise from three o'clock and `b` the signed sweep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arc {
    /// Left edge of the bounding box.
    pub x: i16,
    /// Top edge of the bounding box.
    pub y: i16,
    /// Width of the bounding box.
    pub w: i16,
    /// Height of the bounding box.
    pub h: i16,
    /// Start angle.
    pub a: i16,
    /// Sweep.
    pub b: i16,
}

/// Line end style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapStyle {
    /// Butt cap that omits the last pixel.
    NotLast,
    /// Square end flush with the endpoint.
    #[default]
    Butt,
    /// Semicircular end.
    Round,
    /// Square end projecting half the line width.
    Projecting,
}

/// Line join style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum JoinStyle {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

/// Line dashing style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashes in the foreground, gaps left untouched.
    OnOffDash,
    /// Dashes in the foreground, gaps in the background.
    DoubleDash,
}

/// Source used by fills and strokes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillStyle {
    /// Foreground color.
    #[default]
    Solid,
    /// The tile image, repeated.
    Tiled,
    /// Foreground through the stipple; unset bits untouched.
    Stippled,
    /// Foreground through the stipple; unset bits in the background.
    OpaqueStippled,
}

/// Polygon fill rule.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside when a ray crosses an odd number of edges.
    #[default]
    EvenOdd,
    /// Inside when the winding number is nonzero.
    Winding,
}

/// Raster operation applied to destination pixels.
///
/// A vector backend has no bit-plane operations; the function is stored and
/// reported back but has no effect on drawing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Function {
    /// `0`
    Clear,
    /// `src AND dst`
    And,
    /// `src AND NOT dst`
    AndReverse,
    /// `src`
    #[default]
    Copy,
    /// `NOT src AND dst`
    AndInverted,
    /// `dst`
    NoOp,
    /// `src XOR dst`
    Xor,
    /// `src OR dst`
    Or,
    /// `NOT (src OR dst)`
    Nor,
    /// `NOT src XOR dst`
    Equiv,
    /// `NOT dst`
    Invert,
    /// `src OR NOT dst`
    OrReverse,
    /// `NOT src`
    CopyInverted,
    /// `NOT src OR dst`
    OrInverted,
    /// `NOT (src AND dst)`
    Nand,
    /// `1`
    Set,
}

/// Built-in 8×8 stipple patterns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StipplePattern {
    /// Ordered-dither gray level; `0` is empty and `16` is solid.
    Level(u8),
    /// Horizontal lines.
    Horizontal,
    /// Vertical lines.
    Vertical,
    /// Horizontal and vertical lines.
    Cross,
    /// Lines from top-left to bottom-right.
    Diagonal,
    /// Lines from top-right to bottom-left.
    ReverseDiagonal,
    /// Both diagonals.
    CrossDiagonal,
}

impl Default for StipplePattern {
    fn default() -> Self {
        Self::Level(0)
    }
}

impl CapStyle {
    /// Every cap style, in legacy numeric order.
    pub const ALL: [Self; 4] = [Self::NotLast, Self::Butt, Self::Round, Self::Projecting];

    /// Decode a legacy numeric value; unknown values give [`CapStyle::Butt`].
    pub fn from_raw(raw: u32) -> Self {
        index(&Self::ALL, raw).unwrap_or(Self::Butt)
    }
}

impl JoinStyle {
    /// Every join style, in legacy numeric order.
    pub const ALL: [Self; 3] = [Self::Miter, Self::Round, Self::Bevel];

    /// Decode a legacy numeric value; unknown values give [`JoinStyle::Miter`].
    pub fn from_raw(raw: u32) -> Self {
        index(&Self::ALL, raw).unwrap_or(Self::Miter)
    }
}

impl LineStyle {
    /// Every line style, in legacy numeric order.
    pub const ALL: [Self; 3] = [Self::Solid, Self::OnOffDash, Self::DoubleDash];

    /// Decode a legacy numeric value; unknown values give [`LineStyle::Solid`].
    pub fn from_raw(raw: u32) -> Self {
        index(&Self::ALL, raw).unwrap_or(Self::Solid)
    }
}

impl FillStyle {
    /// Every fill style, in legacy numeric order.
    pub const ALL: [Self; 4] = [
        Self::Solid,
        Self::Tiled,
        Self::Stippled,
        Self::OpaqueStippled,
    ];

    /// Decode a legacy numeric value; unknown values give [`FillStyle::Solid`].
    pub fn from_raw(raw: u32) -> Self {
        index(&Self::ALL, raw).unwrap_or(Self::Solid)
    }
}

impl FillRule {
    /// Every fill rule, in legacy numeric order.
    pub const ALL: [Self; 2] = [Self::EvenOdd, Self::Winding];

    /// Decode a legacy numeric value; unknown values give [`FillRule::EvenOdd`].
    pub fn from_raw(raw: u32) -> Self {
        index(&Self::ALL, raw).unwrap_or(Self::EvenOdd)
    }
}

impl Function {
    /// Every raster function, in legacy numeric order.
    pub const ALL: [Self; 16] = [
        Self::Clear,
        Self::And,
        Self::AndReverse,
        Self::Copy,
        Self::AndInverted,
        Self::NoOp,
        Self::Xor,
        Self::Or,
        Self::Nor,
        Self::Equiv,
        Self::Invert,
        Self::OrReverse,
        Self::CopyInverted,
        Self::OrInverted,
        Self::Nand,
        Self::Set,
    ];

    /// Decode a legacy numeric value; unknown values give [`Function::Copy`].
    pub fn from_raw(raw: u32) -> Self {
        index(&Self::ALL, raw).unwrap_or(Self::Copy)
    }
}

impl StipplePattern {
    /// Highest gray level.
    pub const MAX_LEVEL: u8 = 16;

    /// Decode a legacy numeric value: `0..=16` are gray levels, `17..=22` the
    /// hatches. Larger values clamp to [`StipplePattern::CrossDiagonal`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0..=16 => Self::Level(u8::try_from(raw).unwrap_or(Self::MAX_LEVEL)),
            17 => Self::Horizontal,
            18 => Self::Vertical,
            19 => Self::Cross,
            20 => Self::Diagonal,
            21 => Self::ReverseDiagonal,
            _ => Self::CrossDiagonal,
        }
    }

    /// The same pattern with an out-of-range gray level clamped to solid.
    #[must_use]
    pub fn clamped(self) -> Self {
        match self {
            Self::Level(level) => Self::Level(level.min(Self::MAX_LEVEL)),
            other => other,
        }
    }
}

fn index<T: Copy>(all: &[T], raw: u32) -> Option<T> {
    usize::try_from(raw).ok().and_then(|i| all.get(i)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_rounds_to_nearest() {
        let c = Color::rgba(255, 128, 1, 128);
        // 128 * 255 / 255 = 128, 128 * 128 / 255 = 64.25, 128 * 1 / 255 = 0.502
        assert_eq!(c.to_premultiplied_argb32(), 0x80_80_40_01);
        assert_eq!(Color::WHITE.to_premultiplied_argb32(), 0xff_ff_ff_ff);
        assert_eq!(Color::rgba(200, 10, 30, 0).to_premultiplied_argb32(), 0);
    }

    #[test]
    fn premultiply_round_trip_within_one() {
        for a in (1..=255_u8).step_by(7) {
            for v in (0..=255_u8).step_by(5) {
                let packed = Color::rgba(v, v / 2, 255 - v, a).to_premultiplied_argb32();
                let [pb, pg, pr, pa] = packed.to_le_bytes();
                assert_eq!(pa, a, "alpha is stored as is");
                for (orig, p) in [(v, pr), (v / 2, pg), (255 - v, pb)] {
                    let exact = f64::from(a) * f64::from(orig) / 255.0;
                    assert!(
                        (f64::from(p) - exact).abs() <= 0.51,
                        "{p} is not round({exact})"
                    );
                    let back = f64::from(p) / (f64::from(a) / 255.0);
                    assert!(
                        (back - f64::from(orig)).abs() <= 1.0 + 255.0 / (2.0 * f64::from(a)),
                        "{back} too far from {orig} at alpha {a}"
                    );
                }
            }
        }
    }

    #[test]
    fn unpremultiply_opaque_is_exact() {
        let c = Color::rgb(12, 200, 77);
        assert_eq!(Color::from_premultiplied_argb32(c.to_premultiplied_argb32()), c);
        assert_eq!(Color::from_premultiplied_argb32(0x00_ff_ff_ff), Color::TRANSPARENT);
    }

    #[test]
    fn raw_values_clamp_to_defaults() {
        assert_eq!(CapStyle::from_raw(2), CapStyle::Round);
        assert_eq!(CapStyle::from_raw(99), CapStyle::Butt);
        assert_eq!(JoinStyle::from_raw(7), JoinStyle::Miter);
        assert_eq!(LineStyle::from_raw(2), LineStyle::DoubleDash);
        assert_eq!(LineStyle::from_raw(3), LineStyle::Solid);
        assert_eq!(FillStyle::from_raw(3), FillStyle::OpaqueStippled);
        assert_eq!(FillStyle::from_raw(4), FillStyle::Solid);
        assert_eq!(FillRule::from_raw(1), FillRule::Winding);
        assert_eq!(FillRule::from_raw(u32::MAX), FillRule::EvenOdd);
        assert_eq!(Function::from_raw(6), Function::Xor);
        assert_eq!(Function::from_raw(16), Function::Copy);
    }

    #[test]
    fn stipple_raw_values() {
        assert_eq!(StipplePattern::from_raw(0), StipplePattern::Level(0));
        assert_eq!(StipplePattern::from_raw(16), StipplePattern::Level(16));
        assert_eq!(StipplePattern::from_raw(17), StipplePattern::Horizontal);
        assert_eq!(StipplePattern::from_raw(500), StipplePattern::CrossDiagonal);
        assert_eq!(StipplePattern::Level(40).clamped(), StipplePattern::Level(16));
    }
}
