//! Atlas layout: how a `size³` cube is folded into a `grid × grid` tile sheet.
//!
//! Slice `z` of the cube (blue axis) lives in tile `(z mod grid, z / grid)`,
//! counted left to right, top to bottom. Inside a tile, red runs along x and
//! green along y. The atlas is therefore `size·grid` texels square, and the
//! last `grid² − size` tiles are unused padding.
//!
//! ```text
//! grid = 4, size = 14
//! +----+----+----+----+
//! |  0 |  1 |  2 |  3 |
//! +----+----+----+----+
//! |  4 |  5 |  6 |  7 |
//! +----+----+----+----+
//! |  8 |  9 | 10 | 11 |
//! +----+----+----+----+
//! | 12 | 13 | pad| pad|
//! +----+----+----+----+
//! ```
//!
//! Layouts can be read from YAML:
//!
//! ```yaml
//! size: 64
//! grid: 8
//! interp: trilinear   # or zOnly (default)
//! clampInput: true    # default
//! ```

use crate::{LutError, LutResult};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tlut_core::fract;
use tracing::warn;

/// How the evaluator interpolates between atlas texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Blend the two nearest blue slices; red and green use the nearest
    /// texel inside each tile. Two fetches per pixel. Coarse LUTs band.
    #[default]
    #[serde(rename = "zOnly", alias = "z-only", alias = "zonly", alias = "z_only")]
    ZOnly,
    /// Full trilinear blend over a 2×2×2 texel neighborhood. Eight fetches.
    #[serde(rename = "trilinear")]
    Trilinear,
}

impl Interpolation {
    /// Canonical name as used in layout files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZOnly => "zOnly",
            Self::Trilinear => "trilinear",
        }
    }

    /// Texture fetches per evaluated pixel.
    pub fn fetches(&self) -> usize {
        match self {
            Self::ZOnly => 2,
            Self::Trilinear => 8,
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = LutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zonly" | "z-only" | "z_only" => Ok(Self::ZOnly),
            "trilinear" => Ok(Self::Trilinear),
            _ => Err(LutError::config(format!(
                "unknown interpolation '{s}' (expected zOnly or trilinear)"
            ))),
        }
    }
}

/// Immutable description of a tiled LUT atlas.
///
/// Construction does not validate; [`LutLayout::validate`] is run by
/// [`make_transform`](crate::make_transform) and the atlas binding helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LutLayout {
    /// Samples per cube axis.
    pub size: u32,
    /// Tiles per atlas row and column.
    pub grid: u32,
    /// Interpolation mode.
    pub interpolation: Interpolation,
    /// Clamp input RGB to [0, 1] before lookup. Alpha is never clamped.
    pub clamp_input: bool,
}

/// Tile position of one blue slice in the atlas grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAddress {
    /// Tile column, `slice mod grid`.
    pub col: u32,
    /// Tile row, `slice / grid`.
    pub row: u32,
}

/// Blue-axis decomposition of one input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZSlices {
    /// Lower slice index.
    pub z0: u32,
    /// Upper slice index, `min(z0 + 1, size - 1)`.
    pub z1: u32,
    /// Blend weight toward `z1`.
    pub frac: f32,
}

impl LutLayout {
    /// Layout with the default mode (`zOnly`) and input clamping enabled.
    pub const fn new(size: u32, grid: u32) -> Self {
        Self {
            size,
            grid,
            interpolation: Interpolation::ZOnly,
            clamp_input: true,
        }
    }

    /// Sets the interpolation mode.
    pub const fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Enables or disables input clamping.
    pub const fn with_clamp_input(mut self, clamp_input: bool) -> Self {
        self.clamp_input = clamp_input;
        self
    }

    /// Atlas edge length in texels, `size · grid`.
    pub fn atlas_dim(&self) -> u32 {
        self.size.saturating_mul(self.grid)
    }

    /// Total tiles in the grid.
    pub fn tile_count(&self) -> u32 {
        self.grid.saturating_mul(self.grid)
    }

    /// Tiles that hold no slice.
    pub fn padding_tiles(&self) -> u32 {
        self.tile_count().saturating_sub(self.size)
    }

    /// Checks `size ≥ 1`, `grid ≥ 1` and `grid² ≥ size`.
    pub fn validate(&self) -> LutResult<()> {
        let result = if self.size < 1 {
            Err(LutError::config(format!("size must be >= 1, got {}", self.size)))
        } else if self.grid < 1 {
            Err(LutError::config(format!("grid must be >= 1, got {}", self.grid)))
        } else if (self.grid as u64).pow(2) < self.size as u64 {
            Err(LutError::config(format!(
                "grid {g}x{g} holds {} tiles, fewer than size {}",
                self.grid as u64 * self.grid as u64,
                self.size,
                g = self.grid
            )))
        } else if self.size.checked_mul(self.grid).is_none() {
            Err(LutError::config(format!(
                "atlas {}x{} overflows",
                self.size, self.grid
            )))
        } else {
            Ok(())
        };

        if let Err(e) = &result {
            warn!(size = self.size, grid = self.grid, "{e}");
        }
        result
    }

    /// Validates the layout and checks an atlas of `width × height` against it.
    pub fn validate_atlas(&self, width: u32, height: u32) -> LutResult<()> {
        self.validate()?;

        let dim = self.atlas_dim();
        if width != dim || height != dim {
            let e = LutError::config(format!(
                "atlas is {width}x{height}, size {} grid {} needs {dim}x{dim}",
                self.size, self.grid
            ));
            warn!(width, height, expected = dim, "{e}");
            return Err(e);
        }
        Ok(())
    }

    /// Tile holding blue slice `slice`.
    ///
    /// A zero grid addresses as a single column instead of dividing by zero.
    #[inline]
    pub fn tile_address(&self, slice: u32) -> TileAddress {
        let grid = self.grid.max(1);
        TileAddress {
            col: slice % grid,
            row: slice / grid,
        }
    }

    /// Top-left texel of the tile holding `slice`.
    #[inline]
    pub fn tile_texel_origin(&self, slice: u32) -> (u32, u32) {
        let t = self.tile_address(slice);
        (t.col * self.size, t.row * self.size)
    }

    /// Atlas UV of the top-left corner of the tile holding `slice`.
    #[inline]
    pub fn tile_uv_origin(&self, slice: u32) -> Vec2 {
        let t = self.tile_address(slice);
        Vec2::new(t.col as f32, t.row as f32) / self.grid.max(1) as f32
    }

    /// Splits a blue value into the two slices to blend and the weight.
    ///
    /// `b · (size − 1)` is held to `[0, size − 1]` first, so out-of-range
    /// input (possible with clamping off) extends the edge slices instead of
    /// addressing padding tiles.
    #[inline]
    pub fn z_slices(&self, b: f32) -> ZSlices {
        let max = self.size.saturating_sub(1) as f32;
        let z = (b * max).clamp(0.0, max);
        let z0 = z.floor();
        // NaN input lands here as 0 after the casts below.
        ZSlices {
            z0: z0 as u32,
            z1: (z0 + 1.0).min(max) as u32,
            frac: if z.is_nan() { 0.0 } else { fract(z) },
        }
    }
}

impl Default for LutLayout {
    /// The common 64³ LUT in an 8×8 grid (512×512 atlas).
    fn default() -> Self {
        Self::new(64, 8)
    }
}

impl fmt::Display for LutLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}³ in {}x{} tiles ({}, clamp {})",
            self.size,
            self.grid,
            self.grid,
            self.interpolation,
            if self.clamp_input { "on" } else { "off" }
        )
    }
}

fn default_clamp_input() -> bool {
    true
}

/// Serialized form of a [`LutLayout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutConfig {
    /// Samples per cube axis.
    pub size: u32,
    /// Tiles per atlas row and column.
    pub grid: u32,
    /// Interpolation mode, `zOnly` when omitted.
    #[serde(default)]
    pub interp: Interpolation,
    /// Input clamping, on when omitted.
    #[serde(default = "default_clamp_input")]
    pub clamp_input: bool,
}

impl LayoutConfig {
    /// Loads a layout from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> LutResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Loads a layout from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> LutResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> LutResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to a validated [`LutLayout`].
    pub fn into_layout(self) -> LutResult<LutLayout> {
        let layout = LutLayout::from(self);
        layout.validate()?;
        Ok(layout)
    }
}

impl From<LayoutConfig> for LutLayout {
    fn from(c: LayoutConfig) -> Self {
        LutLayout::new(c.size, c.grid)
            .with_interpolation(c.interp)
            .with_clamp_input(c.clamp_input)
    }
}

impl From<LutLayout> for LayoutConfig {
    fn from(l: LutLayout) -> Self {
        Self {
            size: l.size,
            grid: l.grid,
            interp: l.interpolation,
            clamp_input: l.clamp_input,
        }
    }
}
