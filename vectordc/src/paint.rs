// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planning of fill and stroke passes for a built path.

use smallvec::SmallVec;

use crate::LineStyle;

/// Which color feeds a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PassSource {
    /// The fill style with the foreground.
    Primary,
    /// The fill style with the background standing in for a solid foreground.
    Alternate,
    /// The plain background color.
    Background,
}

/// Dashing of a stroke pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PassDash {
    Solid,
    Primary,
    Permuted,
}

/// One backend draw over the current path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PaintPass {
    Fill {
        source: PassSource,
        preserve: bool,
    },
    Stroke {
        source: PassSource,
        dash: PassDash,
        preserve: bool,
        /// Runs inside its own save and restore.
        isolated: bool,
    },
}

/// Passes that paint the current path.
///
/// A fill under a stroke uses the alternate source and keeps the path for
/// the stroke. A double-dashed stroke first draws the gaps in the
/// background color with the permuted pattern.
pub(crate) fn plan(
    stroke: bool,
    fill: bool,
    preserve: bool,
    style: LineStyle,
) -> SmallVec<[PaintPass; 3]> {
    let mut passes = SmallVec::new();
    if fill {
        passes.push(PaintPass::Fill {
            source: if stroke {
                PassSource::Alternate
            } else {
                PassSource::Primary
            },
            preserve: preserve || stroke,
        });
    }
    if stroke {
        if style == LineStyle::DoubleDash {
            passes.push(PaintPass::Stroke {
                source: PassSource::Background,
                dash: PassDash::Permuted,
                preserve: true,
                isolated: true,
            });
        }
        passes.push(PaintPass::Stroke {
            source: PassSource::Primary,
            dash: if style == LineStyle::Solid {
                PassDash::Solid
            } else {
                PassDash::Primary
            },
            preserve,
            isolated: false,
        });
    }
    passes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fill_and_stroke() {
        assert_eq!(
            plan(false, true, false, LineStyle::DoubleDash).as_slice(),
            [PaintPass::Fill {
                source: PassSource::Primary,
                preserve: false
            }]
        );
        assert_eq!(
            plan(true, false, false, LineStyle::Solid).as_slice(),
            [PaintPass::Stroke {
                source: PassSource::Primary,
                dash: PassDash::Solid,
                preserve: false,
                isolated: false
            }]
        );
    }

    #[test]
    fn fill_under_stroke_keeps_path_and_uses_alternate() {
        let passes = plan(true, true, false, LineStyle::OnOffDash);
        assert_eq!(
            passes.as_slice(),
            [
                PaintPass::Fill {
                    source: PassSource::Alternate,
                    preserve: true
                },
                PaintPass::Stroke {
                    source: PassSource::Primary,
                    dash: PassDash::Primary,
                    preserve: false,
                    isolated: false
                }
            ]
        );
    }

    #[test]
    fn double_dash_draws_gaps_first() {
        let passes = plan(true, false, true, LineStyle::DoubleDash);
        assert_eq!(
            passes.as_slice(),
            [
                PaintPass::Stroke {
                    source: PassSource::Background,
                    dash: PassDash::Permuted,
                    preserve: true,
                    isolated: true
                },
                PaintPass::Stroke {
                    source: PassSource::Primary,
                    dash: PassDash::Primary,
                    preserve: true,
                    isolated: false
                }
            ]
        );
    }

    #[test]
    fn nothing_to_do() {
        assert!(plan(false, false, true, LineStyle::Solid).is_empty());
    }
}
