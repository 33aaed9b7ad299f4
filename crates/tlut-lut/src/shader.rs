//! Shader emission for GPU pipelines.
//!
//! Generates the same evaluator as [`evaluate`](crate::evaluate) in GLSL or
//! WGSL, with the layout baked in as constants, plus a description of how
//! the atlas texture has to be bound.
//!
//! # Example
//!
//! ```
//! use tlut_lut::{LutLayout, ShaderGenerator, ShaderLanguage};
//!
//! let code = ShaderGenerator::new(LutLayout::new(64, 8)).generate(ShaderLanguage::Glsl330);
//! assert!(code.source().contains("vec4 tlut_apply(vec4 color)"));
//! assert_eq!(code.texture().width, 512);
//! ```

use crate::layout::{Interpolation, LutLayout};
use crate::sampler::{FilterMode, SamplerDesc, SamplingResource};
use std::fmt::{self, Write};

/// Target shader language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderLanguage {
    /// GLSL 3.30 (OpenGL 3.3)
    #[default]
    Glsl330,
    /// GLSL ES 3.00 (WebGL 2.0)
    GlslEs300,
    /// WGSL (WebGPU)
    Wgsl,
}

impl ShaderLanguage {
    /// Returns the version directive for this language.
    pub fn version_directive(&self) -> &'static str {
        match self {
            Self::Glsl330 => "#version 330 core",
            Self::GlslEs300 => "#version 300 es\nprecision highp float;",
            Self::Wgsl => "",
        }
    }

    /// Returns true if this is a GLSL variant.
    pub fn is_glsl(&self) -> bool {
        matches!(self, Self::Glsl330 | Self::GlslEs300)
    }
}

/// How the atlas must be uploaded and bound for the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuTextureDesc {
    /// Atlas width in texels.
    pub width: u32,
    /// Atlas height in texels.
    pub height: u32,
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Clamp-to-edge on both axes (always true).
    pub clamp_to_edge: bool,
    /// Generate mipmaps (always false).
    pub mipmaps: bool,
    /// Flip rows on upload.
    pub flip_y: bool,
}

/// Generated shader source plus its texture requirement.
#[derive(Debug, Clone)]
pub struct ShaderCode {
    language: ShaderLanguage,
    source: String,
    texture: GpuTextureDesc,
}

impl ShaderCode {
    /// Target language.
    pub fn language(&self) -> ShaderLanguage {
        self.language
    }

    /// Shader source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Atlas binding requirement.
    pub fn texture(&self) -> &GpuTextureDesc {
        &self.texture
    }
}

/// Emits the tiled-LUT evaluator for a fixed layout.
#[derive(Debug, Clone)]
pub struct ShaderGenerator {
    layout: LutLayout,
    sampler: SamplerDesc,
    entry_point: bool,
}

impl ShaderGenerator {
    /// Generator with nearest sampling and no entry point.
    pub fn new(layout: LutLayout) -> Self {
        Self {
            layout,
            sampler: SamplerDesc::default(),
            entry_point: false,
        }
    }

    /// Sets the sampling policy reported in [`GpuTextureDesc`].
    pub fn with_sampler(mut self, sampler: SamplerDesc) -> Self {
        self.sampler = sampler;
        self
    }

    /// Also emit a full-screen fragment entry point that grades an input
    /// image texture.
    pub fn with_entry_point(mut self, entry_point: bool) -> Self {
        self.entry_point = entry_point;
        self
    }

    /// Texture requirement for this layout and sampler.
    pub fn texture_desc(&self) -> GpuTextureDesc {
        let dim = self.layout.atlas_dim();
        GpuTextureDesc {
            width: dim,
            height: dim,
            min_filter: self.sampler.min_filter,
            mag_filter: self.sampler.mag_filter,
            clamp_to_edge: SamplingResource::CLAMP_TO_EDGE,
            mipmaps: SamplingResource::GENERATE_MIPMAPS,
            flip_y: self.sampler.flip_vertical,
        }
    }

    /// Generates source for `language`.
    pub fn generate(&self, language: ShaderLanguage) -> ShaderCode {
        let mut source = String::new();
        let written = match language {
            ShaderLanguage::Glsl330 | ShaderLanguage::GlslEs300 => {
                self.write_glsl(&mut source, language)
            }
            ShaderLanguage::Wgsl => self.write_wgsl(&mut source),
        };
        written.expect("fmt::Write for String never fails");

        ShaderCode {
            language,
            source,
            texture: self.texture_desc(),
        }
    }

    fn header(&self) -> String {
        format!(
            "Tiled 3D LUT: size {}, grid {}x{}, {}, input clamp {}",
            self.layout.size,
            self.layout.grid,
            self.layout.grid,
            self.layout.interpolation,
            if self.layout.clamp_input { "on" } else { "off" }
        )
    }

    fn write_glsl(&self, code: &mut String, language: ShaderLanguage) -> fmt::Result {
        let l = &self.layout;
        writeln!(code, "{}", language.version_directive())?;
        writeln!(code)?;
        writeln!(code, "// {}", self.header())?;
        writeln!(code, "uniform sampler2D u_lut;")?;
        writeln!(code)?;
        writeln!(code, "const float TLUT_SIZE = {:.1};", l.size as f32)?;
        writeln!(code, "const float TLUT_GRID = {:.1};", l.grid as f32)?;
        writeln!(code, "const float TLUT_MAX = {:.1};", l.size.saturating_sub(1) as f32)?;
        writeln!(code)?;

        writeln!(code, "vec3 tlut_fetch(vec2 texel, float slice) {{")?;
        writeln!(code, "    vec2 tile = vec2(mod(slice, TLUT_GRID), floor(slice / TLUT_GRID));")?;
        writeln!(code, "    vec2 uv = ((texel + 0.5) / TLUT_SIZE + tile) / TLUT_GRID;")?;
        writeln!(code, "    return texture(u_lut, uv).rgb;")?;
        writeln!(code, "}}")?;
        writeln!(code)?;

        if l.interpolation == Interpolation::Trilinear {
            writeln!(code, "vec3 tlut_bilerp(vec2 i0, vec2 i1, vec2 f, float slice) {{")?;
            writeln!(code, "    vec3 c00 = tlut_fetch(i0, slice);")?;
            writeln!(code, "    vec3 c10 = tlut_fetch(vec2(i1.x, i0.y), slice);")?;
            writeln!(code, "    vec3 c01 = tlut_fetch(vec2(i0.x, i1.y), slice);")?;
            writeln!(code, "    vec3 c11 = tlut_fetch(i1, slice);")?;
            writeln!(code, "    return mix(mix(c00, c10, f.x), mix(c01, c11, f.x), f.y);")?;
            writeln!(code, "}}")?;
            writeln!(code)?;
        }

        writeln!(code, "vec4 tlut_apply(vec4 color) {{")?;
        if l.clamp_input {
            writeln!(code, "    vec3 c = clamp(color.rgb, 0.0, 1.0);")?;
        } else {
            writeln!(code, "    vec3 c = color.rgb;")?;
        }
        writeln!(code, "    float zPos = clamp(c.b * TLUT_MAX, 0.0, TLUT_MAX);")?;
        writeln!(code, "    float z0 = floor(zPos);")?;
        writeln!(code, "    float z1 = min(z0 + 1.0, TLUT_MAX);")?;
        writeln!(code, "    float zFrac = zPos - z0;")?;
        match l.interpolation {
            Interpolation::ZOnly => {
                writeln!(code, "    vec2 texel = clamp(c.rg * TLUT_MAX, 0.0, TLUT_MAX);")?;
                writeln!(code, "    vec3 s0 = tlut_fetch(texel, z0);")?;
                writeln!(code, "    vec3 s1 = tlut_fetch(texel, z1);")?;
            }
            Interpolation::Trilinear => {
                writeln!(code, "    vec2 t = clamp(c.rg * TLUT_MAX, 0.0, TLUT_MAX);")?;
                writeln!(code, "    vec2 i0 = floor(t);")?;
                writeln!(code, "    vec2 i1 = min(i0 + 1.0, vec2(TLUT_MAX));")?;
                writeln!(code, "    vec2 f = t - i0;")?;
                writeln!(code, "    vec3 s0 = tlut_bilerp(i0, i1, f, z0);")?;
                writeln!(code, "    vec3 s1 = tlut_bilerp(i0, i1, f, z1);")?;
            }
        }
        writeln!(code, "    return vec4(mix(s0, s1, zFrac), color.a);")?;
        writeln!(code, "}}")?;

        if self.entry_point {
            writeln!(code)?;
            writeln!(code, "in vec2 v_texCoord;")?;
            writeln!(code, "out vec4 fragColor;")?;
            writeln!(code, "uniform sampler2D u_image;")?;
            writeln!(code)?;
            writeln!(code, "void main() {{")?;
            writeln!(code, "    fragColor = tlut_apply(texture(u_image, v_texCoord));")?;
            writeln!(code, "}}")?;
        }
        Ok(())
    }

    fn write_wgsl(&self, code: &mut String) -> fmt::Result {
        let l = &self.layout;
        writeln!(code, "// {}", self.header())?;
        writeln!(code, "@group(0) @binding(0) var tlut_texture: texture_2d<f32>;")?;
        writeln!(code, "@group(0) @binding(1) var tlut_sampler: sampler;")?;
        writeln!(code)?;
        writeln!(code, "const TLUT_SIZE: f32 = {:.1};", l.size as f32)?;
        writeln!(code, "const TLUT_GRID: f32 = {:.1};", l.grid as f32)?;
        writeln!(code, "const TLUT_MAX: f32 = {:.1};", l.size.saturating_sub(1) as f32)?;
        writeln!(code)?;

        writeln!(code, "fn tlut_fetch(texel: vec2<f32>, slice: f32) -> vec3<f32> {{")?;
        writeln!(code, "    let row = floor(slice / TLUT_GRID);")?;
        writeln!(code, "    let tile = vec2<f32>(slice - TLUT_GRID * row, row);")?;
        writeln!(code, "    let uv = ((texel + 0.5) / TLUT_SIZE + tile) / TLUT_GRID;")?;
        writeln!(code, "    return textureSampleLevel(tlut_texture, tlut_sampler, uv, 0.0).rgb;")?;
        writeln!(code, "}}")?;
        writeln!(code)?;

        if l.interpolation == Interpolation::Trilinear {
            writeln!(
                code,
                "fn tlut_bilerp(i0: vec2<f32>, i1: vec2<f32>, f: vec2<f32>, slice: f32) -> vec3<f32> {{"
            )?;
            writeln!(code, "    let c00 = tlut_fetch(i0, slice);")?;
            writeln!(code, "    let c10 = tlut_fetch(vec2<f32>(i1.x, i0.y), slice);")?;
            writeln!(code, "    let c01 = tlut_fetch(vec2<f32>(i0.x, i1.y), slice);")?;
            writeln!(code, "    let c11 = tlut_fetch(i1, slice);")?;
            writeln!(code, "    return mix(mix(c00, c10, f.x), mix(c01, c11, f.x), f.y);")?;
            writeln!(code, "}}")?;
            writeln!(code)?;
        }

        writeln!(code, "fn tlut_apply(color: vec4<f32>) -> vec4<f32> {{")?;
        if l.clamp_input {
            writeln!(code, "    let c = clamp(color.rgb, vec3<f32>(0.0), vec3<f32>(1.0));")?;
        } else {
            writeln!(code, "    let c = color.rgb;")?;
        }
        writeln!(code, "    let zPos = clamp(c.b * TLUT_MAX, 0.0, TLUT_MAX);")?;
        writeln!(code, "    let z0 = floor(zPos);")?;
        writeln!(code, "    let z1 = min(z0 + 1.0, TLUT_MAX);")?;
        writeln!(code, "    let zFrac = zPos - z0;")?;
        match l.interpolation {
            Interpolation::ZOnly => {
                writeln!(
                    code,
                    "    let texel = clamp(c.rg * TLUT_MAX, vec2<f32>(0.0), vec2<f32>(TLUT_MAX));"
                )?;
                writeln!(code, "    let s0 = tlut_fetch(texel, z0);")?;
                writeln!(code, "    let s1 = tlut_fetch(texel, z1);")?;
            }
            Interpolation::Trilinear => {
                writeln!(
                    code,
                    "    let t = clamp(c.rg * TLUT_MAX, vec2<f32>(0.0), vec2<f32>(TLUT_MAX));"
                )?;
                writeln!(code, "    let i0 = floor(t);")?;
                writeln!(code, "    let i1 = min(i0 + 1.0, vec2<f32>(TLUT_MAX));")?;
                writeln!(code, "    let f = t - i0;")?;
                writeln!(code, "    let s0 = tlut_bilerp(i0, i1, f, z0);")?;
                writeln!(code, "    let s1 = tlut_bilerp(i0, i1, f, z1);")?;
            }
        }
        writeln!(code, "    return vec4<f32>(mix(s0, s1, zFrac), color.a);")?;
        writeln!(code, "}}")?;

        if self.entry_point {
            writeln!(code)?;
            writeln!(code, "@group(0) @binding(2) var image_texture: texture_2d<f32>;")?;
            writeln!(code, "@group(0) @binding(3) var image_sampler: sampler;")?;
            writeln!(code)?;
            writeln!(code, "@fragment")?;
            writeln!(
                code,
                "fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {{"
            )?;
            writeln!(
                code,
                "    return tlut_apply(textureSample(image_texture, image_sampler, uv));"
            )?;
            writeln!(code, "}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glsl_zonly() {
        let code = ShaderGenerator::new(LutLayout::new(64, 8)).generate(ShaderLanguage::Glsl330);
        let src = code.source();
        assert!(src.starts_with("#version 330 core"));
        assert!(src.contains("const float TLUT_SIZE = 64.0;"));
        assert!(src.contains("const float TLUT_GRID = 8.0;"));
        assert!(src.contains("clamp(color.rgb, 0.0, 1.0)"));
        assert!(!src.contains("tlut_bilerp"));
        assert!(!src.contains("void main()"));
        assert_eq!(src.matches("tlut_fetch(").count(), 3);
    }

    #[test]
    fn test_glsl_es_trilinear_with_main() {
        let layout = LutLayout::new(33, 6)
            .with_interpolation(Interpolation::Trilinear)
            .with_clamp_input(false);
        let code = ShaderGenerator::new(layout)
            .with_entry_point(true)
            .generate(ShaderLanguage::GlslEs300);
        let src = code.source();
        assert!(src.starts_with("#version 300 es\nprecision highp float;"));
        assert!(src.contains("vec3 c = color.rgb;"));
        assert!(src.contains("tlut_bilerp(i0, i1, f, z1)"));
        assert!(src.contains("void main()"));
        assert_eq!(code.language(), ShaderLanguage::GlslEs300);
    }

    #[test]
    fn test_wgsl() {
        let layout = LutLayout::new(16, 4).with_interpolation(Interpolation::Trilinear);
        let code = ShaderGenerator::new(layout)
            .with_entry_point(true)
            .generate(ShaderLanguage::Wgsl);
        let src = code.source();
        assert!(src.contains("fn tlut_apply(color: vec4<f32>) -> vec4<f32>"));
        assert!(src.contains("const TLUT_MAX: f32 = 15.0;"));
        assert!(src.contains("textureSampleLevel"));
        assert!(src.contains("@fragment"));
        assert!(!src.contains("#version"));
    }

    #[test]
    fn test_zonly_texel_held_in_tile() {
        let layout = LutLayout::new(16, 4).with_clamp_input(false);
        let generator = ShaderGenerator::new(layout);

        let glsl = generator.generate(ShaderLanguage::Glsl330);
        assert!(glsl.source().contains("vec3 c = color.rgb;"));
        assert!(glsl
            .source()
            .contains("vec2 texel = clamp(c.rg * TLUT_MAX, 0.0, TLUT_MAX);"));

        let wgsl = generator.generate(ShaderLanguage::Wgsl);
        assert!(wgsl
            .source()
            .contains("let texel = clamp(c.rg * TLUT_MAX, vec2<f32>(0.0), vec2<f32>(TLUT_MAX));"));
    }

    #[test]
    fn test_texture_desc() {
        let desc = ShaderGenerator::new(LutLayout::new(64, 8))
            .with_sampler(SamplerDesc::linear().with_flip(true))
            .texture_desc();
        assert_eq!((desc.width, desc.height), (512, 512));
        assert_eq!(desc.mag_filter, FilterMode::Linear);
        assert!(desc.clamp_to_edge);
        assert!(!desc.mipmaps);
        assert!(desc.flip_y);
    }

    #[test]
    fn test_language_helpers() {
        assert!(ShaderLanguage::Glsl330.is_glsl());
        assert!(!ShaderLanguage::Wgsl.is_glsl());
        assert_eq!(ShaderLanguage::Wgsl.version_directive(), "");
    }
}
