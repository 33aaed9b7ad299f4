//! Atlas LUT application command

use crate::ApplyArgs;
use anyhow::{Context, Result};
use std::time::Instant;
use tlut_lut::{LutLoad, SamplerDesc, make_transform};
use tracing::{debug, info};

pub fn run(args: ApplyArgs, verbose: bool) -> Result<()> {
    let layout = super::layout_from_args(&args.layout)?;
    let transform = make_transform(layout)?;

    // Decode the atlas while the input image loads.
    let options = SamplerDesc::nearest().with_flip(args.flip);
    let load = LutLoad::spawn(&args.lut, options)
        .with_context(|| format!("Failed to start loading: {}", args.lut.display()))?;

    let image = super::load_image(&args.input)?;
    let lut = load
        .wait()
        .with_context(|| format!("Failed to load LUT: {}", args.lut.display()))?;
    layout
        .validate_atlas(lut.width(), lut.height())
        .with_context(|| format!("LUT {} does not match {}", args.lut.display(), layout))?;

    if verbose {
        println!(
            "Applying {} ({}) to {}",
            args.lut.display(),
            layout,
            args.input.display()
        );
    }

    let start = Instant::now();
    let graded = tlut_ops::apply_image(&image, &transform, &lut)?;
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "graded");

    let out_format = match args.depth {
        Some(depth) => super::depth_format(depth)?,
        None => image.format,
    };
    super::save_image(&args.output, &graded.convert(out_format))?;
    info!(output = %args.output.display(), "written");

    if verbose {
        println!("Done.");
    }

    Ok(())
}
