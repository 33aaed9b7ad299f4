//! Sampling resource: the prepared, read-only atlas plus its sampling policy.
//!
//! The policy is fixed: clamp-to-edge on both axes and no mipmaps. Only the
//! filters and the vertical orientation are configurable.
//!
//! UV `(0, 0)` is the top-left texel of the decoded image. With
//! `flip_vertical` set, rows are addressed bottom-up instead; the flip is
//! applied at lookup time, so re-preparing a resource with a different
//! orientation never copies texel data.

use crate::{LutError, LutResult};
use glam::Vec2;
use std::fmt;
use std::sync::Arc;
use tlut_core::Rgba;

/// Texel filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling: the texel containing the UV.
    #[default]
    Nearest,
    /// Bilinear blend of the four texels around the UV.
    Linear,
}

impl FilterMode {
    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
        }
    }
}

/// Configurable part of the sampling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerDesc {
    /// Minification filter. Recorded for GPU uploads; CPU lookups of a
    /// LUT never minify.
    pub min_filter: FilterMode,
    /// Magnification filter, used by [`SamplingResource::sample`].
    pub mag_filter: FilterMode,
    /// Address rows bottom-up.
    pub flip_vertical: bool,
}

impl SamplerDesc {
    /// Nearest filtering, no flip.
    pub const fn nearest() -> Self {
        Self {
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            flip_vertical: false,
        }
    }

    /// Linear filtering, no flip.
    pub const fn linear() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            flip_vertical: false,
        }
    }

    /// Sets the vertical flip.
    pub const fn with_flip(mut self, flip_vertical: bool) -> Self {
        self.flip_vertical = flip_vertical;
        self
    }
}

/// Immutable RGBA texel grid with a fixed sampling policy.
///
/// Cloning shares the texel storage.
#[derive(Clone)]
pub struct SamplingResource {
    texels: Arc<[Rgba]>,
    width: u32,
    height: u32,
    desc: SamplerDesc,
}

impl SamplingResource {
    /// Addressing is clamp-to-edge on both axes.
    pub const CLAMP_TO_EDGE: bool = true;

    /// Mipmaps are never generated.
    pub const GENERATE_MIPMAPS: bool = false;

    /// Wraps `width × height` texels, row-major, row 0 at the top.
    pub fn new(width: u32, height: u32, texels: Vec<Rgba>, desc: SamplerDesc) -> LutResult<Self> {
        if width == 0 || height == 0 {
            return Err(LutError::config(format!("empty texture {width}x{height}")));
        }
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(LutError::config(format!(
                "{width}x{height} texture needs {expected} texels, got {}",
                texels.len()
            )));
        }

        Ok(Self {
            texels: texels.into(),
            width,
            height,
            desc,
        })
    }

    /// Same texels under a different policy. No texel data is copied.
    pub fn with_desc(&self, desc: SamplerDesc) -> Self {
        Self {
            texels: Arc::clone(&self.texels),
            desc,
            ..*self
        }
    }

    /// Width in texels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sampling policy.
    #[inline]
    pub fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    /// Raw texels in storage order (decoded orientation, flip not applied).
    pub fn texels(&self) -> &[Rgba] {
        &self.texels
    }

    /// True when both resources share one texel buffer.
    pub fn shares_texels_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.texels, &other.texels)
    }

    /// Texel at integer coordinates, clamped to the edge, flip applied.
    #[inline]
    pub fn fetch(&self, x: i32, y: i32) -> Rgba {
        let x = clamp_coord(x, self.width);
        let y = clamp_coord(y, self.height);
        let row = if self.desc.flip_vertical {
            self.height - 1 - y
        } else {
            y
        };
        self.texels[row as usize * self.width as usize + x as usize]
    }

    /// Samples at `uv` with the magnification filter.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> Rgba {
        self.sample_with(uv, self.desc.mag_filter)
    }

    /// Samples at `uv` with an explicit filter.
    pub fn sample_with(&self, uv: Vec2, filter: FilterMode) -> Rgba {
        let size = Vec2::new(self.width as f32, self.height as f32);
        match filter {
            FilterMode::Nearest => {
                let p = (uv * size).floor();
                self.fetch(p.x as i32, p.y as i32)
            }
            FilterMode::Linear => {
                // Texel centers sit at half-integers.
                let p = uv * size - 0.5;
                let p0 = p.floor();
                let f = p - p0;
                let (x0, y0) = (p0.x as i32, p0.y as i32);

                let top = self.fetch(x0, y0).lerp(self.fetch(x0 + 1, y0), f.x);
                let bot = self.fetch(x0, y0 + 1).lerp(self.fetch(x0 + 1, y0 + 1), f.x);
                top.lerp(bot, f.y)
            }
        }
    }
}

impl fmt::Debug for SamplingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingResource")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

#[inline]
fn clamp_coord(coord: i32, size: u32) -> u32 {
    coord.clamp(0, size as i32 - 1) as u32
}
