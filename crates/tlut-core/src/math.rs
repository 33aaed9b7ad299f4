//! Scalar helpers for color interpolation.
//!
//! These mirror the shading-language builtins the evaluator is written
//! against (`mix`, `clamp(x, 0, 1)`, `fract`), so the CPU path and the
//! generated shaders read the same way.
//!
//! ```rust
//! use tlut_core::{lerp, fract, saturate};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(fract(31.5), 0.5);
//! assert_eq!(saturate(-0.2), 0.0);
//! ```

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
///
/// # Formula
///
/// `a + (b - a) * t`
///
/// # Example
///
/// ```rust
/// use tlut_core::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
/// assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
/// ```
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps a value to [0, 1].
///
/// NaN stays NaN, matching `f32::clamp`.
#[inline]
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Fractional part, `x - floor(x)`.
///
/// Unlike [`f32::fract`] this is always non-negative (GLSL semantics),
/// so `fract(-0.25) == 0.75`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 4.0, 0.25), 2.5);
        assert_eq!(lerp(1.0, 1.0, 0.7), 1.0);
    }

    #[test]
    fn test_fract_glsl_semantics() {
        assert_eq!(fract(3.25), 0.25);
        assert_eq!(fract(-0.25), 0.75);
        assert_eq!(fract(7.0), 0.0);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(1.5), 1.0);
        assert_eq!(saturate(-0.2), 0.0);
        assert_eq!(saturate(0.3), 0.3);
    }
}
