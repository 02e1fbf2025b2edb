// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Font slant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Slant {
    /// Oblique leaning left.
    ReverseOblique,
    /// Italic leaning left.
    ReverseItalic,
    /// Upright.
    #[default]
    Straight,
    /// Italic.
    Italic,
    /// Oblique.
    Oblique,
}

impl Slant {
    /// Every slant.
    pub const ALL: [Self; 5] = [
        Self::ReverseOblique,
        Self::ReverseItalic,
        Self::Straight,
        Self::Italic,
        Self::Oblique,
    ];

    /// Decode a legacy numeric value; unknown values give [`Slant::Straight`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::ReverseOblique,
            2 => Self::ReverseItalic,
            8 => Self::Italic,
            9 => Self::Oblique,
            _ => Self::Straight,
        }
    }
}

/// Font set width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SetWidth {
    /// Narrowest.
    UltraCondensed,
    /// Narrower than condensed.
    ExtraCondensed,
    /// Condensed.
    Condensed,
    /// Slightly narrow.
    SemiCondensed,
    /// Normal width.
    #[default]
    Normal,
    /// Slightly wide.
    SemiExpanded,
    /// Expanded.
    Expanded,
    /// Wider than expanded.
    ExtraExpanded,
    /// Widest.
    UltraExpanded,
}

impl SetWidth {
    /// Every set width, narrowest first.
    pub const ALL: [Self; 9] = [
        Self::UltraCondensed,
        Self::ExtraCondensed,
        Self::Condensed,
        Self::SemiCondensed,
        Self::Normal,
        Self::SemiExpanded,
        Self::Expanded,
        Self::ExtraExpanded,
        Self::UltraExpanded,
    ];

    /// Decode a legacy percentage value; unknown values give [`SetWidth::Normal`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            50 => Self::UltraCondensed,
            63 => Self::ExtraCondensed,
            75 => Self::Condensed,
            87 => Self::SemiCondensed,
            113 => Self::SemiExpanded,
            125 => Self::Expanded,
            150 => Self::ExtraExpanded,
            200 => Self::UltraExpanded,
            _ => Self::Normal,
        }
    }
}

/// Attributes of a client font, as the device context sees them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    /// Family name.
    pub family: String,
    /// Slant.
    pub slant: Slant,
    /// Weight on the legacy scale: 10 thin, 40 normal, 70 bold, 90 black.
    pub weight: u16,
    /// Set width.
    pub set_width: SetWidth,
    /// Size in deci-points.
    pub size: u32,
    /// Baseline rotation in 1/64 degree, counter-clockwise.
    pub angle: i32,
}

impl FontDescriptor {
    /// A straight, normal weight, normal width font.
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            slant: Slant::Straight,
            weight: 40,
            set_width: SetWidth::Normal,
            size,
            angle: 0,
        }
    }
}
