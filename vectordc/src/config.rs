// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::{SmallVec, smallvec};

use crate::{Color, FillRule};

/// Emulation settings for a [`VectorDc`](crate::VectorDc).
///
/// Build with struct update syntax:
///
/// ```
/// use vectordc::DcConfig;
///
/// let config = DcConfig {
///     sharpen: false,
///     ..DcConfig::default()
/// };
/// assert_eq!(config.default_dashes.as_slice(), &[4, 4]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DcConfig {
    /// Nudge odd-width strokes onto pixel centers at each session start.
    pub sharpen: bool,
    /// Dash pattern installed at each session start.
    pub default_dashes: SmallVec<[u8; 4]>,
    /// Fill rule installed at each session start.
    pub fill_rule: FillRule,
    /// Control point factor of rounded-rectangle corners.
    ///
    /// `0` chamfers the corner, about `0.6` approximates an ellipse, values
    /// above `1` bulge past it.
    pub round_rect_pointiness: f64,
    /// Overlay color of shaded icons.
    pub selection_background: Color,
    /// Base color of sunken icons.
    pub base_color: Color,
    /// Alpha of the shaded icon overlay.
    pub shaded_alpha: f32,
    /// Alpha of the sunken icon contrast overlay.
    pub sunken_alpha: f32,
    /// Stroke color of hash boxes.
    pub hash_color: peniko::Color,
    /// Stroke color of focus rectangles.
    pub focus_color: peniko::Color,
    /// Stroke width of focus rectangles.
    pub focus_width: f64,
}

impl Default for DcConfig {
    fn default() -> Self {
        Self {
            sharpen: true,
            default_dashes: smallvec![4, 4],
            fill_rule: FillRule::EvenOdd,
            round_rect_pointiness: 0.6,
            selection_background: Color::rgb(10, 36, 106),
            base_color: Color::rgb(212, 208, 200),
            shaded_alpha: 0.5,
            sunken_alpha: 0.7,
            hash_color: peniko::Color::new([0.0, 0.0, 0.0, 0.5]),
            focus_color: peniko::Color::new([0.7, 0.0, 0.0, 0.7]),
            focus_width: 1.5,
        }
    }
}
