// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::{SmallVec, smallvec};
use vectordc_backend::{BlendMode, Mix};

use crate::DcConfig;

/// How an icon is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IconMode {
    /// The icon as is.
    #[default]
    Normal,
    /// Tinted with the selection background, as for a selected item.
    Shaded,
    /// Flattened onto the base color, as for a disabled item.
    Sunken,
}

/// Source of one icon pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum IconSource {
    /// The icon's own pixels.
    Icon,
    Solid(peniko::Color),
}

/// One pass through the icon's mask.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct IconPass {
    pub(crate) source: IconSource,
    pub(crate) blend: BlendMode,
}

impl IconPass {
    fn over(source: IconSource) -> Self {
        Self {
            source,
            blend: BlendMode::default(),
        }
    }
}

/// Passes rendering an icon in `mode`, in order.
pub(crate) fn passes(mode: IconMode, config: &DcConfig) -> SmallVec<[IconPass; 3]> {
    match mode {
        IconMode::Normal => smallvec![IconPass::over(IconSource::Icon)],
        IconMode::Shaded => smallvec![
            IconPass::over(IconSource::Icon),
            IconPass::over(IconSource::Solid(
                config.selection_background.with_alpha(config.shaded_alpha)
            )),
        ],
        IconMode::Sunken => smallvec![
            IconPass::over(IconSource::Solid(config.base_color.with_alpha(1.0))),
            IconPass {
                source: IconSource::Icon,
                blend: Mix::Luminosity.into(),
            },
            IconPass::over(IconSource::Solid(
                config.base_color.with_alpha(config.sunken_alpha)
            )),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_one_pass() {
        let passes = passes(IconMode::Normal, &DcConfig::default());
        assert_eq!(passes.as_slice(), [IconPass::over(IconSource::Icon)]);
    }

    #[test]
    fn shaded_overlays_selection_color() {
        let config = DcConfig::default();
        let passes = passes(IconMode::Shaded, &config);
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].source, IconSource::Icon);
        assert_eq!(
            passes[1].source,
            IconSource::Solid(config.selection_background.with_alpha(0.5))
        );
        assert_eq!(passes[1].blend, BlendMode::default());
    }

    #[test]
    fn sunken_takes_luminosity_onto_base() {
        let config = DcConfig::default();
        let passes = passes(IconMode::Sunken, &config);
        assert_eq!(
            passes[0],
            IconPass::over(IconSource::Solid(config.base_color.into()))
        );
        assert_eq!(passes[1].source, IconSource::Icon);
        assert_eq!(passes[1].blend, BlendMode::from(Mix::Luminosity));
        assert_eq!(
            passes[2],
            IconPass::over(IconSource::Solid(config.base_color.with_alpha(0.7)))
        );
    }
}
