//! Per-channel intensity range scans used by the adaptive quantizers.

use crate::{ColorComponents, ColorSlice};
use palette::cast::AsArrays;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The minimum and maximum intensity observed in one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelRange {
    /// The smallest value in the channel.
    pub min: u8,
    /// The largest value in the channel.
    pub max: u8,
}

impl ChannelRange {
    /// A range that any value will widen. Not a valid range on its own.
    const EMPTY: Self = Self { min: u8::MAX, max: u8::MIN };

    /// The distance between the minimum and maximum.
    #[must_use]
    pub const fn span(self) -> u8 {
        self.max - self.min
    }

    /// Whether every value in the channel is the same.
    #[must_use]
    pub const fn is_flat(self) -> bool {
        self.min == self.max
    }

    /// Widens the range to include `value`.
    #[inline]
    fn include(self, value: u8) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// The smallest range containing both ranges.
    #[inline]
    fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Widens each channel's range to include the components of `color`.
#[inline]
fn include_all<const N: usize>(
    mut ranges: [ChannelRange; N],
    color: &[u8; N],
) -> [ChannelRange; N] {
    for (range, &value) in ranges.iter_mut().zip(color) {
        *range = range.include(value);
    }
    ranges
}

/// Merges two sets of per-channel ranges.
#[inline]
fn merge_all<const N: usize>(
    mut ranges: [ChannelRange; N],
    other: [ChannelRange; N],
) -> [ChannelRange; N] {
    for (range, other) in ranges.iter_mut().zip(other) {
        *range = range.merge(other);
    }
    ranges
}

/// Computes the minimum and maximum of each channel over all of `colors`.
///
/// Returns `None` if `colors` is empty.
///
/// # Examples
/// ```
/// # use levelette::{range::{channel_ranges, ChannelRange}, ColorSlice};
/// # use palette::Srgb;
/// let colors = [Srgb::new(10u8, 0, 7), Srgb::new(20, 255, 7)];
/// let ranges = channel_ranges(ColorSlice::from_truncated(colors.as_slice()));
/// assert_eq!(
///     ranges,
///     Some([
///         ChannelRange { min: 10, max: 20 },
///         ChannelRange { min: 0, max: 255 },
///         ChannelRange { min: 7, max: 7 },
///     ])
/// );
/// ```
#[must_use]
pub fn channel_ranges<Color, const N: usize>(
    colors: ColorSlice<Color>,
) -> Option<[ChannelRange; N]>
where
    Color: ColorComponents<u8, N>,
{
    if colors.is_empty() {
        return None;
    }

    Some(
        colors
            .as_slice()
            .as_arrays()
            .iter()
            .fold([ChannelRange::EMPTY; N], include_all),
    )
}

/// Computes the minimum and maximum of each channel over all of `colors` in parallel.
///
/// Returns `None` if `colors` is empty.
#[cfg(feature = "threads")]
#[must_use]
pub fn channel_ranges_par<Color, const N: usize>(
    colors: ColorSlice<Color>,
) -> Option<[ChannelRange; N]>
where
    Color: ColorComponents<u8, N> + Sync,
{
    if colors.is_empty() {
        return None;
    }

    Some(
        colors
            .as_slice()
            .as_arrays()
            .par_iter()
            .fold(|| [ChannelRange::EMPTY; N], include_all)
            .reduce(|| [ChannelRange::EMPTY; N], merge_all),
    )
}
