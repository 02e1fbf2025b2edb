// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in 8×8 stipple patterns.

use crate::StipplePattern;

/// Side of a built-in stipple pattern in pixels.
pub const PATTERN_SIZE: u32 = 8;

/// 4×4 ordered-dither thresholds; level `n` sets cells below `n`.
const BAYER: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Rows of a built-in pattern as an 8×8 client bitmap, one byte per row,
/// least significant bit first.
pub fn pattern_bits(pattern: StipplePattern) -> [u8; 8] {
    let mut rows = [0_u8; 8];
    for (y, row) in rows.iter_mut().enumerate() {
        for x in 0..8 {
            let set = match pattern.clamped() {
                StipplePattern::Level(level) => BAYER[y % 4][x % 4] < level,
                StipplePattern::Horizontal => y == 0,
                StipplePattern::Vertical => x == 0,
                StipplePattern::Cross => x == 0 || y == 0,
                StipplePattern::Diagonal => x == y,
                StipplePattern::ReverseDiagonal => x == 7 - y,
                StipplePattern::CrossDiagonal => x == y || x == 7 - y,
            };
            if set {
                *row |= 1 << x;
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(rows: [u8; 8]) -> u32 {
        rows.iter().map(|r| r.count_ones()).sum()
    }

    #[test]
    fn gray_levels_cover_four_cells_per_step() {
        for level in 0..=StipplePattern::MAX_LEVEL {
            assert_eq!(
                coverage(pattern_bits(StipplePattern::Level(level))),
                4 * u32::from(level),
                "level {level}"
            );
        }
        assert_eq!(pattern_bits(StipplePattern::Level(16)), [0xff; 8]);
        assert_eq!(pattern_bits(StipplePattern::Level(200)), [0xff; 8]);
        assert_eq!(pattern_bits(StipplePattern::Level(0)), [0; 8]);
    }

    #[test]
    fn gray_levels_are_nested() {
        for level in 1..=StipplePattern::MAX_LEVEL {
            let lower = pattern_bits(StipplePattern::Level(level - 1));
            let upper = pattern_bits(StipplePattern::Level(level));
            for (l, u) in lower.iter().zip(upper) {
                assert_eq!(l & u, *l, "level {level} drops a cell");
            }
        }
    }

    #[test]
    fn hatches() {
        assert_eq!(
            pattern_bits(StipplePattern::Horizontal),
            [0xff, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(pattern_bits(StipplePattern::Vertical), [0x01; 8]);
        assert_eq!(coverage(pattern_bits(StipplePattern::Cross)), 15);
        assert_eq!(
            pattern_bits(StipplePattern::Diagonal),
            [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]
        );
        assert_eq!(
            pattern_bits(StipplePattern::ReverseDiagonal),
            [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01]
        );
        assert_eq!(coverage(pattern_bits(StipplePattern::CrossDiagonal)), 16);
    }
}
