//! Shader emission command

use crate::ShaderArgs;
use anyhow::{Context, Result, bail};
use tlut_lut::{SamplerDesc, ShaderGenerator, ShaderLanguage};

fn parse_language(name: &str) -> Result<ShaderLanguage> {
    match name.to_ascii_lowercase().as_str() {
        "glsl" | "glsl330" => Ok(ShaderLanguage::Glsl330),
        "glsl-es" | "glsles" | "webgl" => Ok(ShaderLanguage::GlslEs300),
        "wgsl" => Ok(ShaderLanguage::Wgsl),
        other => bail!("Unknown shader language: {} (expected glsl, glsl-es or wgsl)", other),
    }
}

pub fn run(args: ShaderArgs, verbose: bool) -> Result<()> {
    let layout = super::layout_from_args(&args.layout)?;
    let language = parse_language(&args.lang)?;
    let sampler = if args.linear {
        SamplerDesc::linear()
    } else {
        SamplerDesc::nearest()
    };

    let code = ShaderGenerator::new(layout)
        .with_sampler(sampler)
        .with_entry_point(args.main)
        .generate(language);

    match &args.output {
        Some(path) => std::fs::write(path, code.source())
            .with_context(|| format!("Failed to save: {}", path.display()))?,
        None => print!("{}", code.source()),
    }

    if verbose {
        let tex = code.texture();
        eprintln!(
            "texture: {}x{}, min {} / mag {}, clamp-to-edge {}, mipmaps {}, flip {}",
            tex.width,
            tex.height,
            tex.min_filter.name(),
            tex.mag_filter.name(),
            tex.clamp_to_edge,
            tex.mipmaps,
            tex.flip_y
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language("GLSL").unwrap(), ShaderLanguage::Glsl330);
        assert_eq!(parse_language("glsl-es").unwrap(), ShaderLanguage::GlslEs300);
        assert_eq!(parse_language("wgsl").unwrap(), ShaderLanguage::Wgsl);
        assert!(parse_language("hlsl").is_err());
    }
}
