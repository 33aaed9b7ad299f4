//! # tlut-io
//!
//! Image decode/encode for LUT atlases.
//!
//! - **PNG** - lossless, 8/16-bit, the recommended atlas container
//! - **JPEG** - 8-bit, read for compatibility with existing LUT packs
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tlut_io::{read, write};
//!
//! let atlas = read("lut.png")?;
//! let texels = atlas.to_rgba()?;
//! write("copy.png", &atlas)?;
//! ```
//!
//! Integer samples are normalized to [0, 1] (`v / 255`, `v / 65535`) and
//! nothing else: no gamma or color-space conversion happens here.
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};

use std::path::Path;
use tlut_core::Rgba;

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is not
/// supported, or the data is corrupted.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let path = path.as_ref();
    let format = Format::detect(path)?;

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        _ => Err(IoError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}

/// Decodes an image held in memory, detecting the format from magic bytes.
pub fn read_from_memory(bytes: &[u8]) -> IoResult<ImageData> {
    match Format::from_bytes(bytes) {
        #[cfg(feature = "png")]
        Format::Png => png::read_from_memory(bytes),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read_from_memory(bytes),

        _ => Err(IoError::UnsupportedFormat("unrecognized header".into())),
    }
}

/// Writes an image to a file, detecting format from extension.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let path = path.as_ref();

    match Format::from_extension(path) {
        #[cfg(feature = "png")]
        Format::Png => png::write(path, image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, image),

        _ => Err(IoError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}

/// Decoded image: dimensions plus interleaved samples, row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of channels (1 gray, 2 gray-alpha, 3 RGB, 4 RGBA).
    pub channels: u32,
    /// Pixel data format.
    pub format: PixelFormat,
    /// Raw pixel data.
    pub data: PixelData,
}

/// Pixel data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit unsigned integer per channel.
    U8,
    /// 16-bit unsigned integer per channel.
    U16,
    /// 32-bit float per channel.
    F32,
}

/// Raw pixel data storage.
#[derive(Debug, Clone)]
pub enum PixelData {
    /// 8-bit unsigned data.
    U8(Vec<u8>),
    /// 16-bit unsigned data.
    U16(Vec<u16>),
    /// 32-bit float data.
    F32(Vec<f32>),
}

impl PixelData {
    /// Number of stored samples.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    /// True when no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageData {
    /// Creates a zero-filled image with the given dimensions and format.
    pub fn new(width: u32, height: u32, channels: u32, format: PixelFormat) -> Self {
        let size = width as usize * height as usize * channels as usize;
        let data = match format {
            PixelFormat::U8 => PixelData::U8(vec![0u8; size]),
            PixelFormat::U16 => PixelData::U16(vec![0u16; size]),
            PixelFormat::F32 => PixelData::F32(vec![0.0f32; size]),
        };

        Self {
            width,
            height,
            channels,
            format,
            data,
        }
    }

    /// Creates ImageData from f32 pixel data.
    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::F32,
            data: PixelData::F32(data),
        }
    }

    /// Creates ImageData from u8 pixel data.
    pub fn from_u8(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::U8,
            data: PixelData::U8(data),
        }
    }

    /// Creates ImageData from u16 pixel data.
    pub fn from_u16(width: u32, height: u32, channels: u32, data: Vec<u16>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::U16,
            data: PixelData::U16(data),
        }
    }

    /// Returns the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the total number of samples (pixels * channels).
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// Checks that the buffer holds exactly `width * height * channels` samples.
    pub fn check_len(&self) -> IoResult<()> {
        if self.data.len() != self.sample_count() {
            return Err(IoError::DimensionMismatch {
                expected: format!(
                    "{} samples ({}x{}x{})",
                    self.sample_count(),
                    self.width,
                    self.height,
                    self.channels
                ),
                actual: format!("{} samples", self.data.len()),
            });
        }
        Ok(())
    }

    /// Converts pixel data to f32 in [0, 1] (floats are passed through).
    pub fn to_f32(&self) -> Vec<f32> {
        match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as f32 / 255.0).collect(),
            PixelData::U16(data) => data.iter().map(|&v| v as f32 / 65535.0).collect(),
            PixelData::F32(data) => data.clone(),
        }
    }

    /// Converts pixel data to u8 (for display/saving).
    pub fn to_u8(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(data) => data.clone(),
            PixelData::U16(data) => data.iter().map(|&v| (v >> 8) as u8).collect(),
            PixelData::F32(data) => data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
        }
    }

    /// Converts pixel data to u16, clamping floats to [0, 1].
    pub fn to_u16(&self) -> Vec<u16> {
        match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as u16 * 257).collect(),
            PixelData::U16(data) => data.clone(),
            PixelData::F32(data) => data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
                .collect(),
        }
    }

    /// Returns a copy stored in `format`.
    pub fn convert(&self, format: PixelFormat) -> ImageData {
        let data = match format {
            PixelFormat::U8 => PixelData::U8(self.to_u8()),
            PixelFormat::U16 => PixelData::U16(self.to_u16()),
            PixelFormat::F32 => PixelData::F32(self.to_f32()),
        };
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            format,
            data,
        }
    }

    /// Expands the samples into one [`Rgba`] per pixel, row-major.
    ///
    /// Gray is replicated into RGB; images without alpha get alpha 1.0.
    pub fn to_rgba(&self) -> IoResult<Vec<Rgba>> {
        self.check_len()?;
        let samples = self.to_f32();

        let texels = match self.channels {
            1 => samples.iter().map(|&v| Rgba::gray(v, 1.0)).collect(),
            2 => samples
                .chunks_exact(2)
                .map(|ga| Rgba::gray(ga[0], ga[1]))
                .collect(),
            3 | 4 => samples
                .chunks_exact(self.channels as usize)
                .filter_map(Rgba::from_slice)
                .collect(),
            n => {
                return Err(IoError::UnsupportedFormat(format!("{} channels", n)));
            }
        };
        Ok(texels)
    }
}
