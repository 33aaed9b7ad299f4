//! Per-pixel LUT application over whole buffers.
//!
//! The atlas is checked against the transform's layout once per call;
//! pixels are then evaluated without further validation.

use crate::{OpsError, OpsResult};
use tlut_core::Rgba;
use tlut_io::ImageData;
use tlut_lut::{BoundTransform, SamplingResource, TiledLutTransform};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Grades an interleaved RGB or RGBA `f32` buffer into a new buffer.
///
/// Alpha samples are copied unchanged; 3-channel pixels are evaluated with
/// alpha 1.0, which is then dropped.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] when the buffer does not match
/// `width × height × channels`, [`OpsError::InvalidParameter`] for channel
/// counts other than 3 or 4, and [`OpsError::Lut`] when the atlas does not
/// fit the layout.
pub fn apply_rgba(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    transform: &TiledLutTransform,
    resource: &SamplingResource,
) -> OpsResult<Vec<f32>> {
    let mut dst = src.to_vec();
    apply_rgba_in_place(&mut dst, width, height, channels, transform, resource)?;
    Ok(dst)
}

/// In-place form of [`apply_rgba`].
pub fn apply_rgba_in_place(
    buf: &mut [f32],
    width: usize,
    height: usize,
    channels: usize,
    transform: &TiledLutTransform,
    resource: &SamplingResource,
) -> OpsResult<()> {
    check_buffer(buf.len(), width, height, channels)?;
    let lut = transform.bind(resource)?;

    debug!(
        width,
        height,
        channels,
        interp = %transform.layout().interpolation,
        "applying LUT"
    );

    let row_len = width * channels;

    #[cfg(feature = "parallel")]
    buf.par_chunks_mut(row_len)
        .for_each(|row| grade_row(row, channels, &lut));

    #[cfg(not(feature = "parallel"))]
    buf.chunks_mut(row_len)
        .for_each(|row| grade_row(row, channels, &lut));

    Ok(())
}

/// Grades an image, returning `F32` pixels of the same size and channels.
pub fn apply_image(
    image: &ImageData,
    transform: &TiledLutTransform,
    resource: &SamplingResource,
) -> OpsResult<ImageData> {
    let out = apply_rgba(
        &image.to_f32(),
        image.width as usize,
        image.height as usize,
        image.channels as usize,
        transform,
        resource,
    )?;
    Ok(ImageData::from_f32(image.width, image.height, image.channels, out))
}

fn grade_row(row: &mut [f32], channels: usize, lut: &BoundTransform) {
    for px in row.chunks_exact_mut(channels) {
        if let Some(c) = Rgba::from_slice(px) {
            let out = lut.apply(c);
            px[..3].copy_from_slice(&out.rgb());
        }
    }
}

fn check_buffer(len: usize, width: usize, height: usize, channels: usize) -> OpsResult<()> {
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions(
            "width and height must be > 0".into(),
        ));
    }
    if channels != 3 && channels != 4 {
        return Err(OpsError::InvalidParameter(format!(
            "LUT application needs 3 or 4 channels, got {channels}"
        )));
    }

    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| OpsError::InvalidDimensions("image dimensions overflow".into()))?;

    if len != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected, len
        )));
    }
    Ok(())
}
