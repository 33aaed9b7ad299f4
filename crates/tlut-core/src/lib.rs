//! # tlut-core
//!
//! Core value types shared by the tiled-LUT crates.
//!
//! - [`Rgba`] - four-channel `f32` color with named channel accessors
//! - [`lerp`], [`saturate`], [`fract`] - scalar helpers used by the evaluator
//!
//! ## Crate Structure
//!
//! ```text
//! tlut-core (this crate)
//!    ^
//!    |
//!    +-- tlut-lut (layout, sampling resource, evaluator)
//!    +-- tlut-ops (whole-image application)
//!    +-- tlut-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod math;
pub mod pixel;

pub use math::{fract, lerp, saturate};
pub use pixel::Rgba;

/// Prelude module for convenient imports.
///
/// ```
/// use tlut_core::prelude::*;
///
/// let c = Rgba::opaque(0.2, 0.4, 0.6);
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(c.a, 1.0);
/// ```
pub mod prelude {
    pub use crate::math::{fract, lerp, saturate};
    pub use crate::pixel::Rgba;
}
