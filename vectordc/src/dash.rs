// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;
use vectordc_backend::Dashes;

/// Longest accepted dash list; longer lists are truncated.
pub const MAX_DASHES: usize = 32;

/// A dash list with its phase, plus the complementary pattern used for the
/// background pass of double-dashed lines.
///
/// The complementary pattern is the list rotated right by one element, so its
/// "on" runs cover the primary pattern's gaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashPattern {
    lengths: SmallVec<[u8; 8]>,
    offset: u32,
    permuted: SmallVec<[u8; 8]>,
    permuted_offset: u32,
}

impl DashPattern {
    /// Build a pattern from alternating on/off lengths and a starting offset.
    ///
    /// A single length is doubled into an even on/off pair. The offset is
    /// reduced modulo the pattern total. Returns `None` when the total is zero.
    pub fn new(offset: u32, pattern: &[u8]) -> Option<Self> {
        let pattern = &pattern[..pattern.len().min(MAX_DASHES)];
        let mut lengths: SmallVec<[u8; 8]> = SmallVec::from_slice(pattern);
        if let [only] = *pattern {
            lengths.push(only);
        }
        let total: u32 = lengths.iter().map(|&d| u32::from(d)).sum();
        if total == 0 {
            return None;
        }
        let offset = offset % total;
        let (&last, rest) = lengths.split_last()?;
        let mut permuted = SmallVec::with_capacity(lengths.len());
        permuted.push(last);
        permuted.extend_from_slice(rest);
        let permuted_offset = (offset + u32::from(last)) % total;
        Some(Self {
            lengths,
            offset,
            permuted,
            permuted_offset,
        })
    }

    /// On/off lengths.
    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    /// Offset into the pattern, always below [`DashPattern::total`].
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Complementary lengths.
    pub fn permuted(&self) -> &[u8] {
        &self.permuted
    }

    /// Offset into the complementary pattern.
    pub fn permuted_offset(&self) -> u32 {
        self.permuted_offset
    }

    /// Sum of the lengths.
    pub fn total(&self) -> u32 {
        self.lengths.iter().map(|&d| u32::from(d)).sum()
    }

    /// Backend dash array and offset of the primary pattern.
    pub fn dashes(&self) -> (Dashes, f64) {
        (to_dashes(&self.lengths), f64::from(self.offset))
    }

    /// Backend dash array and offset of the complementary pattern.
    pub fn permuted_dashes(&self) -> (Dashes, f64) {
        (to_dashes(&self.permuted), f64::from(self.permuted_offset))
    }
}

impl Default for DashPattern {
    fn default() -> Self {
        Self {
            lengths: SmallVec::from_slice(&[4, 4]),
            offset: 0,
            permuted: SmallVec::from_slice(&[4, 4]),
            permuted_offset: 4,
        }
    }
}

fn to_dashes(lengths: &[u8]) -> Dashes {
    lengths.iter().map(|&d| f64::from(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_four_four() {
        assert_eq!(DashPattern::new(0, &[4, 4]), Some(DashPattern::default()));
    }

    #[test]
    fn single_length_is_doubled() {
        let d = DashPattern::new(7, &[3]).expect("nonzero total");
        assert_eq!(d.lengths(), &[3, 3]);
        assert_eq!(d.total(), 6);
        assert_eq!(d.offset(), 1);
    }

    #[test]
    fn zero_total_is_rejected() {
        assert_eq!(DashPattern::new(0, &[]), None);
        assert_eq!(DashPattern::new(3, &[0, 0, 0]), None);
    }

    #[test]
    fn long_lists_are_truncated() {
        let d = DashPattern::new(0, &[1; 40]).expect("nonzero total");
        assert_eq!(d.lengths().len(), MAX_DASHES);
    }

    #[test]
    fn offset_and_permutation_invariants() {
        let lists: [&[u8]; 5] = [&[1, 2, 3, 4], &[5], &[2, 7, 1], &[0, 9], &[255, 1, 255]];
        for list in lists {
            for offset in [0, 1, 5, 17, 1000, u32::MAX] {
                let d = DashPattern::new(offset, list).expect("nonzero total");
                let total = d.total();
                assert!(d.offset() < total, "offset {} >= {total}", d.offset());
                assert!(d.permuted_offset() < total);

                let n = d.lengths().len();
                assert_eq!(d.permuted().len(), n);
                assert_eq!(d.permuted()[0], d.lengths()[n - 1]);
                for i in 1..n {
                    assert_eq!(d.permuted()[i], d.lengths()[i - 1]);
                }
                assert_eq!(
                    d.permuted_offset(),
                    (d.offset() + u32::from(d.permuted()[0])) % total
                );
            }
        }
    }

    #[test]
    fn backend_dashes_are_lengths() {
        let d = DashPattern::new(2, &[1, 2, 3]).expect("nonzero total");
        let (dashes, offset) = d.dashes();
        assert_eq!(dashes.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(offset, 2.0);
        let (dashes, offset) = d.permuted_dashes();
        assert_eq!(dashes.as_slice(), &[3.0, 1.0, 2.0]);
        assert_eq!(offset, 5.0);
    }
}
