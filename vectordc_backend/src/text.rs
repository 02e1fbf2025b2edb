// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Point, Rect};

use crate::{BackendError, VectorBackend};

/// Slant of a backend font description.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Slanted roman.
    Oblique,
    /// True italic.
    Italic,
}

/// Width class of a backend font description.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontStretch {
    /// 50% of normal width.
    UltraCondensed,
    /// 62.5% of normal width.
    ExtraCondensed,
    /// 75% of normal width.
    Condensed,
    /// 87.5% of normal width.
    SemiCondensed,
    /// Normal width.
    #[default]
    Normal,
    /// 112.5% of normal width.
    SemiExpanded,
    /// 125% of normal width.
    Expanded,
    /// 150% of normal width.
    ExtraExpanded,
    /// 200% of normal width.
    UltraExpanded,
}

/// Backend font description.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontDescription {
    /// Family name.
    pub family: String,
    /// Slant.
    pub style: FontStyle,
    /// CSS-style weight, 100 to 900.
    pub weight: u16,
    /// Width class.
    pub stretch: FontStretch,
    /// Size in units of 1/[`FontDescription::SCALE`] points.
    pub size: i32,
}

impl FontDescription {
    /// Fixed-point scale of [`FontDescription::size`].
    pub const SCALE: i32 = 1024;

    /// Size in points.
    #[inline]
    pub fn size_points(&self) -> f64 {
        f64::from(self.size) / f64::from(Self::SCALE)
    }
}

impl Default for FontDescription {
    fn default() -> Self {
        Self {
            family: String::new(),
            style: FontStyle::Normal,
            weight: 400,
            stretch: FontStretch::Normal,
            size: 12 * Self::SCALE,
        }
    }
}

/// A text layout engine.
pub trait TextEngine: fmt::Debug {
    /// Create an empty layout.
    fn create_layout(&self) -> Box<dyn TextLayout>;
}

/// A paragraph of text laid out with one font.
///
/// Metrics are in user units with the layout's top-left corner at the origin.
pub trait TextLayout: fmt::Debug {
    /// Replace the text.
    fn set_text(&mut self, text: &str);

    /// Bind a font description.
    fn set_font_description(&mut self, desc: &FontDescription) -> Result<(), BackendError>;

    /// Distance from the top of the layout to the first baseline.
    fn baseline(&self) -> f64;

    /// Logical extents of the laid-out text.
    fn logical_extents(&self) -> Rect;

    /// Render the layout with its top-left corner at `origin`, filling glyphs
    /// with the backend's current source.
    ///
    /// Rendering starts a new path, so any path pending on `backend` is
    /// discarded. Callers must not have a path under construction.
    fn show(&self, backend: &mut dyn VectorBackend, origin: Point) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_points_uses_fixed_point_scale() {
        let desc = FontDescription {
            size: 9 * FontDescription::SCALE + FontDescription::SCALE / 2,
            ..FontDescription::default()
        };
        assert_eq!(desc.size_points(), 9.5);
    }

    #[test]
    fn stretch_orders_by_width() {
        assert!(FontStretch::Condensed < FontStretch::Normal);
        assert!(FontStretch::UltraExpanded > FontStretch::Expanded);
    }
}
