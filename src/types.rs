//! Contains various types needed across the crate.

use crate::{MAX_BITS, MAX_PIXELS, MIN_BITS};
use std::{
    error::Error,
    fmt::{Debug, Display},
    ops::Deref,
};
#[cfg(feature = "image")]
use {
    image::{GrayImage, RgbImage},
    palette::{cast::ComponentsAs, Srgb, SrgbLuma},
};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> Error for AboveMaxLen<T> {}

/// An error type for a bit depth outside of the range [`MIN_BITS`]`..=`[`MAX_BITS`].
///
/// The inner value is the rejected bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BitDepthOutOfRange(pub u8);

impl Display for BitDepthOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bit depth {} is outside of the supported range {MIN_BITS}..={MAX_BITS}",
            self.0
        )
    }
}

impl Error for BitDepthOutOfRange {}

/// A simple new type wrapper around `&'a [Color]` with the invariant that the length of the
/// inner slice must not be greater than [`MAX_PIXELS`].
///
/// # Examples
/// Use `try_into` or [`ColorSlice::from_truncated`] to create [`ColorSlice`]s.
///
/// From a raw color slice:
/// ```
/// # use levelette::{ColorSlice, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// let srgb = vec![Srgb::new(0, 0, 0)];
/// let colors: ColorSlice<_> = srgb.as_slice().try_into()?;
/// # Ok(())
/// # }
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use levelette::ColorSlice;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let colors = ColorSlice::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorSlice<'a, Color>(&'a [Color]);

impl<'a, Color> Clone for ColorSlice<'a, Color> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, Color> Copy for ColorSlice<'a, Color> {}

impl<'a, Color> ColorSlice<'a, Color> {
    /// Creates a [`ColorSlice`] without ensuring that its length
    /// is less than or equal to [`MAX_PIXELS`].
    pub(crate) const fn new_unchecked(colors: &'a [Color]) -> Self {
        Self(colors)
    }

    /// Creates a new [`ColorSlice`] by truncating the input slice to a max length of [`MAX_PIXELS`].
    pub fn from_truncated(colors: &'a [Color]) -> Self {
        Self(&colors[..colors.len().min(MAX_PIXELS as usize)])
    }

    /// Returns the length of the slice as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_colors(&self) -> u32 {
        self.0.len() as u32
    }

    /// Returns the inner slice with the lifetime of the original data.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [Color] {
        self.0
    }
}

impl<'a, Color> AsRef<[Color]> for ColorSlice<'a, Color> {
    fn as_ref(&self) -> &[Color] {
        self
    }
}

impl<'a, Color> Deref for ColorSlice<'a, Color> {
    type Target = [Color];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'a, Color> From<ColorSlice<'a, Color>> for &'a [Color] {
    fn from(val: ColorSlice<'a, Color>) -> Self {
        val.0
    }
}

impl<'a, Color> TryFrom<&'a [Color]> for ColorSlice<'a, Color> {
    type Error = AboveMaxLen<u32>;

    fn try_from(slice: &'a [Color]) -> Result<Self, Self::Error> {
        if slice.len() <= MAX_PIXELS as usize {
            Ok(Self(slice))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for ColorSlice<'a, Srgb<u8>> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        let pixels = image.pixels().len();
        if pixels <= MAX_PIXELS as usize {
            let buf = &image.as_raw()[..(pixels * 3)];
            Ok(Self(buf.components_as()))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a GrayImage> for ColorSlice<'a, SrgbLuma<u8>> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a GrayImage) -> Result<Self, Self::Error> {
        let pixels = image.pixels().len();
        if pixels <= MAX_PIXELS as usize {
            let buf = &image.as_raw()[..pixels];
            Ok(Self(buf.components_as()))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

/// The number of bits kept per channel, which determines the number of quantization levels
/// (`2^bits`).
///
/// This is a simple new type wrapper around `u8` with the invariant that it must be
/// in the range [`MIN_BITS`]`..=`[`MAX_BITS`].
/// Consequently, the uniform step size `256 / 2^bits` is never zero.
///
/// # Examples
/// Use `try_into` or [`BitDepth::from_clamped`] to create [`BitDepth`]s.
///
/// ```
/// # use levelette::{BitDepth, BitDepthOutOfRange};
/// # fn main() -> Result<(), BitDepthOutOfRange> {
/// let bits = BitDepth::try_from(3)?;
/// assert_eq!(bits.num_levels(), 8);
///
/// let bits = BitDepth::from_clamped(12);
/// assert_eq!(bits, BitDepth::MAX);
///
/// assert!(BitDepth::try_from(0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BitDepth(u8);

impl BitDepth {
    /// The smallest supported bit depth (two levels).
    pub const MIN: Self = Self(MIN_BITS);

    /// The largest supported bit depth (the full 8-bit range).
    pub const MAX: Self = Self(MAX_BITS);

    /// Gets the inner `u8` value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// Creates a [`BitDepth`] by clamping the given `u8` into [`MIN_BITS`]`..=`[`MAX_BITS`].
    #[must_use]
    pub const fn from_clamped(value: u8) -> Self {
        if value < MIN_BITS {
            Self::MIN
        } else if value > MAX_BITS {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// The number of quantization levels, `2^bits`.
    #[must_use]
    pub const fn num_levels(self) -> u16 {
        1 << self.0
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self(2)
    }
}

impl From<BitDepth> for u8 {
    fn from(val: BitDepth) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = BitDepthOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_BITS..=MAX_BITS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BitDepthOutOfRange(value))
        }
    }
}

impl Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}
