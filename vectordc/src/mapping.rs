// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of device-context enums into backend values.

use vectordc_backend::{Cap, FontDescription, FontStretch, FontStyle, Join};

use crate::{CapStyle, FillRule, FontDescriptor, JoinStyle, SetWidth, Slant};

/// Backend cap for a line cap style.
pub fn cap(style: CapStyle) -> Cap {
    match style {
        CapStyle::Round => Cap::Round,
        CapStyle::Projecting => Cap::Square,
        CapStyle::NotLast | CapStyle::Butt => Cap::Butt,
    }
}

/// Backend join for a line join style.
pub fn join(style: JoinStyle) -> Join {
    match style {
        JoinStyle::Miter => Join::Miter,
        JoinStyle::Round => Join::Round,
        JoinStyle::Bevel => Join::Bevel,
    }
}

/// Backend fill rule.
pub fn fill_rule(rule: FillRule) -> vectordc_backend::FillRule {
    match rule {
        FillRule::EvenOdd => vectordc_backend::FillRule::EvenOdd,
        FillRule::Winding => vectordc_backend::FillRule::NonZero,
    }
}

/// Backend font style for a slant. Reverse slants have no backend
/// counterpart and render upright.
pub fn font_style(slant: Slant) -> FontStyle {
    match slant {
        Slant::Italic => FontStyle::Italic,
        Slant::Oblique => FontStyle::Oblique,
        Slant::ReverseOblique | Slant::ReverseItalic | Slant::Straight => FontStyle::Normal,
    }
}

/// Backend stretch for a set width.
pub fn font_stretch(width: SetWidth) -> FontStretch {
    match width {
        SetWidth::UltraCondensed => FontStretch::UltraCondensed,
        SetWidth::ExtraCondensed => FontStretch::ExtraCondensed,
        SetWidth::Condensed => FontStretch::Condensed,
        SetWidth::SemiCondensed => FontStretch::SemiCondensed,
        SetWidth::Normal => FontStretch::Normal,
        SetWidth::SemiExpanded => FontStretch::SemiExpanded,
        SetWidth::Expanded => FontStretch::Expanded,
        SetWidth::ExtraExpanded => FontStretch::ExtraExpanded,
        SetWidth::UltraExpanded => FontStretch::UltraExpanded,
    }
}

/// Backend weight: the legacy weight times ten, kept within 1 to 1000.
pub fn font_weight(weight: u16) -> u16 {
    weight.saturating_mul(10).clamp(1, 1000)
}

/// Backend size in 1/[`FontDescription::SCALE`] points from deci-points.
pub fn font_size(deci_points: u32) -> i32 {
    let scaled = i64::from(deci_points) * i64::from(FontDescription::SCALE) / 10;
    i32::try_from(scaled).unwrap_or(i32::MAX)
}

/// Backend font description for a client font.
pub fn font_description(font: &FontDescriptor) -> FontDescription {
    FontDescription {
        family: font.family.clone(),
        style: font_style(font.slant),
        weight: font_weight(font.weight),
        stretch: font_stretch(font.set_width),
        size: font_size(font.size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_map_one_to_one_except_not_last() {
        let mapped: Vec<Cap> = CapStyle::ALL.iter().map(|&c| cap(c)).collect();
        assert_eq!(mapped, [Cap::Butt, Cap::Butt, Cap::Round, Cap::Square]);
    }

    #[test]
    fn joins_are_exhaustive_and_distinct() {
        let mapped: Vec<Join> = JoinStyle::ALL.iter().map(|&j| join(j)).collect();
        assert_eq!(mapped, [Join::Miter, Join::Round, Join::Bevel]);
    }

    #[test]
    fn fill_rules_are_exhaustive() {
        assert_eq!(
            FillRule::ALL.map(fill_rule),
            [
                vectordc_backend::FillRule::EvenOdd,
                vectordc_backend::FillRule::NonZero
            ]
        );
    }

    #[test]
    fn slants_map_to_three_styles() {
        assert_eq!(
            Slant::ALL.map(font_style),
            [
                FontStyle::Normal,
                FontStyle::Normal,
                FontStyle::Normal,
                FontStyle::Italic,
                FontStyle::Oblique
            ]
        );
    }

    #[test]
    fn set_widths_keep_their_order() {
        let stretches = SetWidth::ALL.map(font_stretch);
        assert!(stretches.windows(2).all(|w| w[0] < w[1]));
        for raw in [50, 63, 75, 87, 100, 113, 125, 150, 200] {
            let width = SetWidth::from_raw(raw);
            assert_eq!(width == SetWidth::Normal, raw == 100, "raw {raw}");
        }
        assert_eq!(SetWidth::from_raw(77), SetWidth::Normal);
    }

    #[test]
    fn weight_and_size_scale() {
        assert_eq!(font_weight(40), 400);
        assert_eq!(font_weight(70), 700);
        assert_eq!(font_weight(0), 1);
        assert_eq!(font_weight(u16::MAX), 1000);
        assert_eq!(font_size(90), 9 * 1024);
        assert_eq!(font_size(95), 9728);
        assert_eq!(font_size(u32::MAX), i32::MAX);
    }

    #[test]
    fn description_from_descriptor() {
        let font = FontDescriptor {
            slant: Slant::Italic,
            weight: 70,
            set_width: SetWidth::Condensed,
            ..FontDescriptor::new("Helvetica", 120)
        };
        let desc = font_description(&font);
        assert_eq!(desc.family, "Helvetica");
        assert_eq!(desc.style, FontStyle::Italic);
        assert_eq!(desc.weight, 700);
        assert_eq!(desc.stretch, FontStretch::Condensed);
        assert_eq!(desc.size_points(), 12.0);
    }
}
