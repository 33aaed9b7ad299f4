//! Identity atlas generation.
//!
//! The identity atlas is the neutral starting image for a grade: push it
//! through any color pipeline (a grading app, a photo editor) and the
//! result is a LUT for that pipeline.

use crate::layout::LutLayout;
use crate::sampler::{SamplerDesc, SamplingResource};
use crate::LutResult;
use tlut_core::Rgba;
use tlut_io::ImageData;

/// Builds the neutral atlas texels for `layout`, row-major.
///
/// Texel `(x, y)` of slice `z` holds `(x, y, z) / (size − 1)` with alpha 1.
/// Padding tiles are opaque black.
fn identity_texels(layout: &LutLayout) -> LutResult<Vec<Rgba>> {
    layout.validate()?;

    let dim = layout.atlas_dim() as usize;
    let size = layout.size;
    let scale = if size > 1 { 1.0 / (size - 1) as f32 } else { 0.0 };

    let mut texels = vec![Rgba::BLACK; dim * dim];
    for z in 0..size {
        let (ox, oy) = layout.tile_texel_origin(z);
        for y in 0..size {
            let row = (oy + y) as usize * dim + ox as usize;
            for x in 0..size {
                texels[row + x as usize] =
                    Rgba::opaque(x as f32 * scale, y as f32 * scale, z as f32 * scale);
            }
        }
    }
    Ok(texels)
}

/// Identity atlas as a float RGBA image, ready to be written to disk.
///
/// ```
/// use tlut_lut::identity_atlas;
///
/// let img = identity_atlas(64, 8).unwrap();
/// assert_eq!((img.width, img.height, img.channels), (512, 512, 4));
/// ```
pub fn identity_atlas(size: u32, grid: u32) -> LutResult<ImageData> {
    let layout = LutLayout::new(size, grid);
    let texels = identity_texels(&layout)?;
    let dim = layout.atlas_dim();

    let data = texels.iter().flat_map(|t| t.to_array()).collect();
    Ok(ImageData::from_f32(dim, dim, 4, data))
}

/// Identity atlas as a ready sampling resource, skipping the image round trip.
pub fn identity_resource(layout: &LutLayout) -> LutResult<SamplingResource> {
    let texels = identity_texels(layout)?;
    let dim = layout.atlas_dim();
    SamplingResource::new(dim, dim, texels, SamplerDesc::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_texel_values() {
        let layout = LutLayout::new(4, 2);
        let lut = identity_resource(&layout).unwrap();
        assert_eq!(lut.dimensions(), (8, 8));

        // Slice 3 sits in tile (1, 1); its local texel (1, 2) is atlas (5, 6).
        let t = lut.fetch(5, 6);
        assert_abs_diff_eq!(t.r, 1.0 / 3.0);
        assert_abs_diff_eq!(t.g, 2.0 / 3.0);
        assert_abs_diff_eq!(t.b, 1.0);
        assert_eq!(t.a, 1.0);
    }

    #[test]
    fn test_padding_is_black() {
        let layout = LutLayout::new(3, 2);
        let lut = identity_resource(&layout).unwrap();
        // Tile 3 (bottom right) is padding.
        for y in 3..6 {
            for x in 3..6 {
                assert_eq!(lut.fetch(x, y), Rgba::BLACK);
            }
        }
    }

    #[test]
    fn test_identity_atlas_image() {
        let img = identity_atlas(2, 2).unwrap();
        assert_eq!((img.width, img.height, img.channels), (4, 4, 4));
        let px = img.to_rgba().unwrap();
        // Last pixel: slice 3 is padding (size 2 uses tiles 0 and 1).
        assert_eq!(px[15], Rgba::BLACK);
        // Pixel (3, 1): slice 1, local (1, 1).
        assert_eq!(px[7], Rgba::opaque(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_size_one() {
        let img = identity_atlas(1, 1).unwrap();
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.to_rgba().unwrap(), vec![Rgba::BLACK]);
    }

    #[test]
    fn test_invalid_layout() {
        assert!(identity_atlas(10, 3).unwrap_err().is_configuration());
    }
}
