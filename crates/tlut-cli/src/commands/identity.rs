//! Identity atlas command.
//!
//! The neutral atlas is the usual starting point for grading a LUT in an
//! external tool: grade it like a plate, save it, then `tlut apply` it.

use crate::IdentityArgs;
use anyhow::{Context, Result};
use tlut_lut::{LayoutConfig, LutLayout, identity_atlas};

pub fn run(args: IdentityArgs, verbose: bool) -> Result<()> {
    let format = super::depth_format(args.depth)?;
    let atlas = identity_atlas(args.size, args.grid)?;
    super::save_image(&args.output, &atlas.convert(format))?;

    if let Some(path) = &args.write_layout {
        let config = LayoutConfig::from(LutLayout::new(args.size, args.grid));
        let yaml = config.to_yaml_string()?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to save: {}", path.display()))?;
    }

    if verbose {
        println!(
            "{}: {}x{} identity, size {}, grid {}",
            args.output.display(),
            atlas.width,
            atlas.height,
            args.size,
            args.grid
        );
    }

    Ok(())
}
