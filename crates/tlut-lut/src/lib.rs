//! # tlut-lut
//!
//! 3D color LUTs stored as tiled 2D atlases.
//!
//! A `size³` LUT is cut into `size` slices along blue; each slice is a
//! `size × size` tile (red along x, green along y) and the tiles are laid
//! out in a `grid × grid` sheet. This runs on backends without volume
//! textures, at the price of the manual tile addressing implemented here.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tlut_core::Rgba;
//! use tlut_lut::{make_transform, prepare, Interpolation, LutLayout, SamplerDesc};
//!
//! let layout = LutLayout::new(64, 8).with_interpolation(Interpolation::Trilinear);
//! let transform = make_transform(layout)?;
//! let lut = transform.bind(&prepare("grade.png", SamplerDesc::default())?)?;
//!
//! let graded = lut.apply(Rgba::new(0.5, 0.4, 0.3, 1.0));
//! ```
//!
//! # Modules
//!
//! - [`layout`] - atlas geometry, slice/tile math, YAML config
//! - [`sampler`] - the immutable sampling resource
//! - [`resource`] - preparation from files, images, resources; background load
//! - [`eval`] - the per-pixel evaluator (`zOnly`, `trilinear`)
//! - [`atlas`] - identity atlas generation
//! - [`shader`] - GLSL/WGSL emission of the same evaluator
//!
//! # Dependencies
//!
//! - [`tlut-core`] - `Rgba` and scalar helpers
//! - [`tlut-io`] - atlas decoding
//! - [`glam`] - UV math
//! - [`serde`] / [`serde_yaml`] - layout files

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod atlas;
pub mod eval;
pub mod layout;
pub mod resource;
pub mod sampler;
pub mod shader;

pub use atlas::{identity_atlas, identity_resource};
pub use error::{LutError, LutResult};
pub use eval::{evaluate, make_transform, BoundTransform, TiledLutTransform};
pub use layout::{Interpolation, LayoutConfig, LutLayout, TileAddress, ZSlices};
pub use resource::{prepare, prepare_for_layout, LutLoad, LutSource};
pub use sampler::{FilterMode, SamplerDesc, SamplingResource};
pub use shader::{GpuTextureDesc, ShaderCode, ShaderGenerator, ShaderLanguage};
