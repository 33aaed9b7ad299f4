//! The per-pixel tiled-LUT evaluator.
//!
//! For an input color `c` and a layout of `size` and `grid`:
//!
//! 1. RGB is clamped to [0, 1] when `clamp_input` is set.
//! 2. `b · (size − 1)` picks slices `z0`, `z1` and the blend weight.
//! 3. Each slice lives in tile `(z mod grid, z / grid)`; inside the tile
//!    `(r, g) · (size − 1)` is a texel coordinate, and texel `i` has its
//!    center at tile-local UV `(i + 0.5) / size`.
//! 4. `zOnly` samples each slice once at the (unrounded) local coordinate,
//!    so the sampler's filter decides r/g; `trilinear` blends the 2×2
//!    texel neighborhood by the fractional r/g position, red pair first.
//! 5. The two slice colors are blended by the z weight; alpha is copied
//!    from the input untouched.
//!
//! The evaluator never validates. Feed it a layout that passed
//! [`LutLayout::validate`] and a resource that passed
//! [`LutLayout::validate_atlas`], or use [`TiledLutTransform::bind`].

use crate::layout::{Interpolation, LutLayout};
use crate::sampler::SamplingResource;
use crate::LutResult;
use glam::Vec2;
use tlut_core::Rgba;
use tracing::debug;

/// Evaluates the tiled LUT for one color.
///
/// # Example
///
/// ```
/// use tlut_core::Rgba;
/// use tlut_lut::{evaluate, identity_resource, LutLayout, Interpolation};
///
/// let layout = LutLayout::new(16, 4).with_interpolation(Interpolation::Trilinear);
/// let lut = identity_resource(&layout).unwrap();
///
/// let out = evaluate(Rgba::new(0.3, 0.6, 0.9, 0.5), &lut, &layout);
/// assert!((out.g - 0.6).abs() < 1e-4);
/// assert_eq!(out.a, 0.5);
/// ```
#[inline]
pub fn evaluate(color: Rgba, resource: &SamplingResource, layout: &LutLayout) -> Rgba {
    Kernel::new(layout).eval(color, resource)
}

/// Validates `layout` and returns the reusable per-pixel transform.
pub fn make_transform(layout: LutLayout) -> LutResult<TiledLutTransform> {
    layout.validate()?;
    debug!(%layout, "tiled LUT transform");
    Ok(TiledLutTransform {
        layout,
        kernel: Kernel::new(&layout),
    })
}

/// Validated layout with its lookup constants precomputed.
///
/// Stateless: `apply` may be called from any number of threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiledLutTransform {
    layout: LutLayout,
    kernel: Kernel,
}

impl TiledLutTransform {
    /// The layout this transform was built from.
    pub fn layout(&self) -> &LutLayout {
        &self.layout
    }

    /// Evaluates one color against `resource`.
    ///
    /// The atlas is not checked against the layout; a mismatch produces
    /// wrong but well-defined colors.
    #[inline]
    pub fn apply(&self, color: Rgba, resource: &SamplingResource) -> Rgba {
        self.kernel.eval(color, resource)
    }

    /// Checks the atlas geometry once and pairs it with this transform.
    pub fn bind(&self, resource: &SamplingResource) -> LutResult<BoundTransform> {
        self.layout
            .validate_atlas(resource.width(), resource.height())?;
        Ok(BoundTransform {
            transform: *self,
            resource: resource.clone(),
        })
    }
}

/// A transform paired with an atlas whose dimensions match its layout.
///
/// Owns a shared handle to the texels, so it can be moved into worker
/// threads.
#[derive(Debug, Clone)]
pub struct BoundTransform {
    transform: TiledLutTransform,
    resource: SamplingResource,
}

impl BoundTransform {
    /// Evaluates one color.
    #[inline]
    pub fn apply(&self, color: Rgba) -> Rgba {
        self.transform.apply(color, &self.resource)
    }

    /// The underlying transform.
    pub fn transform(&self) -> &TiledLutTransform {
        &self.transform
    }

    /// The bound atlas.
    pub fn resource(&self) -> &SamplingResource {
        &self.resource
    }

    /// Borrowing closure form, for APIs that take `Fn(Rgba) -> Rgba`.
    pub fn as_fn(&self) -> impl Fn(Rgba) -> Rgba + Send + Sync + '_ {
        move |c| self.apply(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Kernel {
    layout: LutLayout,
    /// `size − 1`, the largest texel index inside a tile.
    max_index: f32,
    inv_size: f32,
    inv_grid: f32,
}

impl Kernel {
    fn new(layout: &LutLayout) -> Self {
        Self {
            layout: *layout,
            max_index: layout.size.saturating_sub(1) as f32,
            inv_size: 1.0 / layout.size.max(1) as f32,
            inv_grid: 1.0 / layout.grid.max(1) as f32,
        }
    }

    /// Atlas UV of a (possibly fractional) in-tile texel coordinate.
    #[inline]
    fn slice_uv(&self, texel: Vec2, slice: u32) -> Vec2 {
        let tile = self.layout.tile_address(slice);
        let tile = Vec2::new(tile.col as f32, tile.row as f32);
        ((texel + 0.5) * self.inv_size + tile) * self.inv_grid
    }

    #[inline]
    fn eval(&self, color: Rgba, lut: &SamplingResource) -> Rgba {
        let c = if self.layout.clamp_input {
            color.clamp_rgb()
        } else {
            color
        };

        let z = self.layout.z_slices(c.b);
        let rg = Vec2::new(c.r, c.g) * self.max_index;

        let (c0, c1) = match self.layout.interpolation {
            Interpolation::ZOnly => {
                // Stay inside the slice's tile.
                let texel = rg.clamp(Vec2::ZERO, Vec2::splat(self.max_index));
                (
                    lut.sample(self.slice_uv(texel, z.z0)),
                    lut.sample(self.slice_uv(texel, z.z1)),
                )
            }
            Interpolation::Trilinear => {
                let corner = Corner::new(rg, self.max_index);
                (self.bilerp(lut, &corner, z.z0), self.bilerp(lut, &corner, z.z1))
            }
        };

        c0.lerp_rgb(c1, z.frac).with_alpha(color.a)
    }

    /// Four fetches in one slice, blended red pair first, then green.
    #[inline]
    fn bilerp(&self, lut: &SamplingResource, corner: &Corner, slice: u32) -> Rgba {
        let (i0, i1, f) = (corner.i0, corner.i1, corner.frac);
        let c00 = lut.sample(self.slice_uv(i0, slice));
        let c10 = lut.sample(self.slice_uv(Vec2::new(i1.x, i0.y), slice));
        let c01 = lut.sample(self.slice_uv(Vec2::new(i0.x, i1.y), slice));
        let c11 = lut.sample(self.slice_uv(i1, slice));

        let top = c00.lerp_rgb(c10, f.x);
        let bot = c01.lerp_rgb(c11, f.x);
        top.lerp_rgb(bot, f.y)
    }
}

/// Lower/upper texel indices and weights of a 2×2 neighborhood.
struct Corner {
    i0: Vec2,
    i1: Vec2,
    frac: Vec2,
}

impl Corner {
    /// The upper index stops at `max_index`, where its weight is zero, so
    /// the neighborhood never leaves the tile.
    #[inline]
    fn new(texel: Vec2, max_index: f32) -> Self {
        let max = Vec2::splat(max_index);
        let t = texel.clamp(Vec2::ZERO, max);
        let i0 = t.floor();
        Self {
            i0,
            i1: (i0 + 1.0).min(max),
            frac: t - i0,
        }
    }
}
