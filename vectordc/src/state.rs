// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vectordc_backend::{Dashes, DrawableId};

use crate::dash::DashPattern;
use crate::{
    CapStyle, Color, FillRule, FillStyle, Function, JoinStyle, LineStyle, StipplePattern,
};

/// A tile image remembered by identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TileRef {
    pub(crate) drawable: DrawableId,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// The current stipple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Stipple {
    /// A client bitmap, copied when it was set.
    Bitmap {
        key: DrawableId,
        width: u32,
        height: u32,
        bits: Vec<u8>,
    },
    Pattern(StipplePattern),
}

/// Abstract pen and brush state, as set by the client.
#[derive(Clone, Debug)]
pub(crate) struct DrawState {
    pub(crate) foreground: Color,
    pub(crate) background: Color,
    /// Zero means one device pixel.
    pub(crate) line_width: u32,
    pub(crate) cap: CapStyle,
    pub(crate) join: JoinStyle,
    pub(crate) line_style: LineStyle,
    pub(crate) dashes: DashPattern,
    pub(crate) fill_style: FillStyle,
    pub(crate) fill_rule: FillRule,
    pub(crate) function: Function,
    pub(crate) tile: Option<TileRef>,
    pub(crate) stipple: Option<Stipple>,
    /// Shared by tile and stipple.
    pub(crate) pattern_origin: (i32, i32),
    pub(crate) sharpen: bool,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            line_width: 0,
            cap: CapStyle::Butt,
            join: JoinStyle::Miter,
            line_style: LineStyle::Solid,
            dashes: DashPattern::default(),
            fill_style: FillStyle::Solid,
            fill_rule: FillRule::EvenOdd,
            function: Function::Copy,
            tile: None,
            stipple: None,
            pattern_origin: (0, 0),
            sharpen: true,
        }
    }
}

/// What the backend currently holds as its source.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ResolvedSource {
    Solid(Color),
    Tile {
        drawable: DrawableId,
        origin: (i32, i32),
    },
    Stipple {
        key: StippleKey,
        origin: (i32, i32),
    },
}

/// Everything a stipple surface's pixels depend on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StippleKey {
    pub(crate) stipple: Stipple,
    pub(crate) foreground: Color,
    /// `None` leaves unset bits transparent.
    pub(crate) background: Option<Color>,
}

/// Backend state last pushed by the resolver.
///
/// `None` means unknown; the next use pushes the value again.
#[derive(Clone, Debug, Default)]
pub(crate) struct Resolved {
    pub(crate) source: Option<ResolvedSource>,
    pub(crate) line_width: Option<u32>,
    /// `Some(None)` is a solid stroke.
    pub(crate) dash: Option<Option<(Dashes, f64)>>,
}

impl Resolved {
    /// Forget everything, after the backend state may have been restored.
    pub(crate) fn invalidate(&mut self) {
        *self = Self::default();
    }
}
