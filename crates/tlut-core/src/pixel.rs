//! The color value type used throughout the evaluator.
//!
//! [`Rgba`] is a plain four-channel `f32` color. Channels are nominally in
//! [0, 1] but nothing restricts them; clamping is an explicit operation
//! ([`Rgba::clamp_rgb`]) so that callers control when it happens.
//!
//! # Memory Layout
//!
//! `#[repr(C)]` with channels in `r, g, b, a` order, so a `&[Rgba]` has the
//! same layout as an interleaved RGBA `f32` buffer.

use crate::math::{lerp, saturate};
use std::fmt;

/// RGBA color with `f32` channels.
///
/// # Example
///
/// ```
/// use tlut_core::Rgba;
///
/// let c = Rgba::new(0.25, 0.5, 0.75, 1.0);
/// assert_eq!(c.rgb(), [0.25, 0.5, 0.75]);
///
/// let clamped = Rgba::new(1.5, -0.2, 0.5, 2.0).clamp_rgb();
/// assert_eq!(clamped, Rgba::new(1.0, 0.0, 0.5, 2.0));
/// ```
#[repr(C)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Rgba {
    /// Red channel value.
    pub r: f32,
    /// Green channel value.
    pub g: f32,
    /// Blue channel value.
    pub b: f32,
    /// Alpha channel value.
    pub a: f32,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Transparent black (all zeros).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new RGBA color.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color (alpha = 1.0).
    #[inline]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a grayscale color with equal RGB values.
    #[inline]
    pub const fn gray(v: f32, a: f32) -> Self {
        Self::new(v, v, v, a)
    }

    /// RGB channels as an array (alpha discarded).
    #[inline]
    pub fn rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Replace the alpha channel.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Get RGBA values as an array.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from an array.
    #[inline]
    pub fn from_array(arr: [f32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Create from an interleaved slice of 3 or 4 channels.
    ///
    /// Three-channel input gets opaque alpha. Returns `None` for any other
    /// length.
    #[inline]
    pub fn from_slice(px: &[f32]) -> Option<Self> {
        match px {
            &[r, g, b] => Some(Self::opaque(r, g, b)),
            &[r, g, b, a] => Some(Self::new(r, g, b, a)),
            _ => None,
        }
    }

    /// Apply a function to RGB channels (preserving alpha).
    #[inline]
    pub fn map_rgb<F: Fn(f32) -> f32>(self, f: F) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Clamp RGB to [0, 1]. Alpha is left as-is.
    #[inline]
    pub fn clamp_rgb(self) -> Self {
        self.map_rgb(saturate)
    }

    /// Per-channel linear blend of all four channels.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            lerp(self.a, other.a, t),
        )
    }

    /// Linear blend of RGB, keeping `self`'s alpha.
    #[inline]
    pub fn lerp_rgb(self, other: Self, t: f32) -> Self {
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            self.a,
        )
    }

    /// Largest absolute per-channel RGB difference.
    #[inline]
    pub fn max_rgb_diff(self, other: Self) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

impl From<[f32; 4]> for Rgba {
    #[inline]
    fn from(arr: [f32; 4]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba({:.6}, {:.6}, {:.6}, {:.6})", self.r, self.g, self.b, self.a)
    }
}
