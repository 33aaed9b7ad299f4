//! Atlas info command.
//!
//! Prints atlas dimensions, tile usage and whether the image fits the layout.

use crate::InfoArgs;
use anyhow::Result;
use tlut_io::Format;

pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    let layout = super::layout_from_args(&args.layout)?;
    let format = Format::detect(&args.input).unwrap_or(Format::Unknown);
    let image = super::load_image(&args.input)?;

    println!("{}", args.input.display());
    println!("  Resolution: {}x{}", image.width, image.height);
    println!("  Channels:   {}", image.channels);
    println!("  Layout:     {}", layout);
    println!("  Expected:   {0}x{0}", layout.atlas_dim());
    println!(
        "  Tiles:      {} used, {} padding",
        layout.size,
        layout.padding_tiles()
    );

    if verbose {
        println!("  Format:     {:?} {:?}", format, image.format);
        println!("  Fetches:    {} per pixel", layout.interpolation.fetches());
        if format.is_lossy() {
            println!("  Note:       lossy container, expect banding in the graded result");
        }
    }

    match layout.validate_atlas(image.width, image.height) {
        Ok(()) => println!("  Valid:      yes"),
        Err(e) => println!("  Valid:      no ({})", e),
    }

    Ok(())
}
