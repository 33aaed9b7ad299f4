//! CLI command implementations

pub mod apply;
pub mod identity;
pub mod info;
pub mod shader;

use crate::LayoutArgs;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tlut_io::{ImageData, PixelFormat};
use tlut_lut::{Interpolation, LayoutConfig, LutLayout};

/// Load image from path
pub fn load_image(path: &Path) -> Result<ImageData> {
    tlut_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &ImageData) -> Result<()> {
    tlut_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Builds the layout from `--layout` or `--size/--grid`, then applies
/// `--interp` and `--no-clamp` on top.
pub fn layout_from_args(args: &LayoutArgs) -> Result<LutLayout> {
    let mut layout: LutLayout = match (&args.layout, args.size, args.grid) {
        (Some(path), _, _) => LayoutConfig::from_file(path)
            .with_context(|| format!("Failed to read layout: {}", path.display()))?
            .into(),
        (None, Some(size), Some(grid)) => LutLayout::new(size, grid),
        _ => bail!("Either --layout or both --size and --grid are required"),
    };

    if let Some(interp) = &args.interp {
        layout.interpolation = interp.parse::<Interpolation>()?;
    }
    if args.no_clamp {
        layout.clamp_input = false;
    }

    layout.validate().context("Invalid layout")?;
    Ok(layout)
}

/// Maps a `--depth` value to a storage format.
pub fn depth_format(depth: u8) -> Result<PixelFormat> {
    match depth {
        8 => Ok(PixelFormat::U8),
        16 => Ok(PixelFormat::U16),
        other => bail!("Unsupported bit depth: {} (expected 8 or 16)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(size: Option<u32>, grid: Option<u32>) -> LayoutArgs {
        LayoutArgs {
            size,
            grid,
            layout: None,
            interp: None,
            no_clamp: false,
        }
    }

    #[test]
    fn test_layout_from_flags() {
        let mut a = args(Some(33), Some(6));
        a.interp = Some("trilinear".into());
        a.no_clamp = true;
        let layout = layout_from_args(&a).unwrap();
        assert_eq!((layout.size, layout.grid), (33, 6));
        assert_eq!(layout.interpolation, Interpolation::Trilinear);
        assert!(!layout.clamp_input);
    }

    #[test]
    fn test_layout_rejects_small_grid() {
        assert!(layout_from_args(&args(Some(64), Some(7))).is_err());
        assert!(layout_from_args(&args(Some(64), None)).is_err());
    }

    #[test]
    fn test_depth_format() {
        assert_eq!(depth_format(8).unwrap(), PixelFormat::U8);
        assert_eq!(depth_format(16).unwrap(), PixelFormat::U16);
        assert!(depth_format(12).is_err());
    }
}
