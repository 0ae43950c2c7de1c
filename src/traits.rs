use palette::cast::ArrayCast;

/// A color type that is a plain array of `N` components.
///
/// This is implemented for every [`ArrayCast`] color, so the quantizers work on
/// single channel colors like [`SrgbLuma<u8>`](palette::SrgbLuma) and
/// three channel colors like [`Srgb<u8>`](palette::Srgb) alike.
pub trait ColorComponents<Component, const N: usize>:
    ArrayCast<Array = [Component; N]> + Copy + 'static
{
}

impl<Color, Component, const N: usize> ColorComponents<Component, N> for Color where
    Color: ArrayCast<Array = [Component; N]> + Copy + 'static
{
}
