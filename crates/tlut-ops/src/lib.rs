//! # tlut-ops
//!
//! Applies a tiled LUT to whole images.
//!
//! The evaluator in `tlut-lut` grades one color; this crate runs it over
//! interleaved `f32` buffers and [`ImageData`](tlut_io::ImageData), one row
//! per work item. With the default `parallel` feature rows are spread over
//! the rayon thread pool.
//!
//! ```rust
//! use tlut_lut::{identity_resource, make_transform, LutLayout};
//! use tlut_ops::apply_rgba;
//!
//! let transform = make_transform(LutLayout::new(16, 4)).unwrap();
//! let lut = identity_resource(transform.layout()).unwrap();
//!
//! let src = vec![0.5f32; 8 * 8 * 4];
//! let out = apply_rgba(&src, 8, 8, 4, &transform, &lut).unwrap();
//! assert!((out[0] - 0.5).abs() < 0.05);
//! ```

#![warn(missing_docs)]

mod error;
pub mod apply;

pub use apply::{apply_image, apply_rgba, apply_rgba_in_place};
pub use error::{OpsError, OpsResult};
