//! LUT resource preparation.
//!
//! [`prepare`] turns a path, a decoded image or an existing resource into a
//! [`SamplingResource`]. Decoding normalizes integer samples to [0, 1] and
//! does nothing else: no gamma, no color-space conversion.
//!
//! [`LutLoad`] runs the same preparation for a path on a background thread.
//! The resource only exists once [`LutLoad::wait`] returns it, so nothing
//! can evaluate against a half-loaded atlas.

use crate::layout::LutLayout;
use crate::sampler::{SamplerDesc, SamplingResource};
use crate::{LutError, LutResult};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tlut_io::{ImageData, IoError};
use tracing::{debug, trace};

/// Where atlas texels come from.
#[derive(Debug, Clone)]
pub enum LutSource {
    /// Image file (PNG or JPEG) to decode.
    Path(PathBuf),
    /// Already-decoded pixels.
    Image(ImageData),
    /// Existing resource; its texels are shared, not copied.
    Resource(SamplingResource),
}

impl LutSource {
    /// Label used in logs and [`LutError::ResourceLoad`].
    pub fn name(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Image(img) => format!("<image {}x{}>", img.width, img.height),
            Self::Resource(r) => format!("<resource {}x{}>", r.width(), r.height()),
        }
    }
}

impl From<PathBuf> for LutSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<&Path> for LutSource {
    fn from(p: &Path) -> Self {
        Self::Path(p.to_path_buf())
    }
}

impl From<&str> for LutSource {
    fn from(p: &str) -> Self {
        Self::Path(PathBuf::from(p))
    }
}

impl From<ImageData> for LutSource {
    fn from(img: ImageData) -> Self {
        Self::Image(img)
    }
}

impl From<SamplingResource> for LutSource {
    fn from(r: SamplingResource) -> Self {
        Self::Resource(r)
    }
}

/// Prepares a sampling resource with the given filter/orientation policy.
///
/// # Errors
///
/// [`LutError::ResourceLoad`] if a path cannot be read or decoded, or if
/// decoded pixels cannot be expanded to RGBA.
pub fn prepare(source: impl Into<LutSource>, options: SamplerDesc) -> LutResult<SamplingResource> {
    let source = source.into();
    let name = source.name();
    trace!(source = %name, ?options, "preparing LUT");

    let resource = match source {
        LutSource::Path(path) => {
            let image = tlut_io::read(&path).map_err(|cause| LutError::ResourceLoad {
                source_name: name.clone(),
                cause,
            })?;
            from_image(&image, options, &name)?
        }
        LutSource::Image(image) => from_image(&image, options, &name)?,
        LutSource::Resource(r) => r.with_desc(options),
    };

    debug!(
        source = %name,
        width = resource.width(),
        height = resource.height(),
        "LUT ready"
    );
    Ok(resource)
}

/// [`prepare`], then checks the atlas against `layout`.
pub fn prepare_for_layout(
    source: impl Into<LutSource>,
    options: SamplerDesc,
    layout: &LutLayout,
) -> LutResult<SamplingResource> {
    layout.validate()?;
    let resource = prepare(source, options)?;
    layout.validate_atlas(resource.width(), resource.height())?;
    Ok(resource)
}

fn from_image(image: &ImageData, desc: SamplerDesc, name: &str) -> LutResult<SamplingResource> {
    let load_err = |cause: IoError| LutError::ResourceLoad {
        source_name: name.to_string(),
        cause,
    };

    let texels = image.to_rgba().map_err(load_err)?;
    SamplingResource::new(image.width, image.height, texels, desc).map_err(|e| {
        load_err(IoError::DecodeError(e.to_string()))
    })
}

/// Background decode of an atlas file.
///
/// Exactly one decode attempt is made.
///
/// ```no_run
/// use tlut_lut::{LutLoad, SamplerDesc};
///
/// let load = LutLoad::spawn("grade.png", SamplerDesc::default())?;
/// // ... set up the rest of the pipeline ...
/// let lut = load.wait()?;
/// # Ok::<(), tlut_lut::LutError>(())
/// ```
#[derive(Debug)]
pub struct LutLoad {
    source_name: String,
    handle: JoinHandle<LutResult<SamplingResource>>,
}

impl LutLoad {
    /// Starts decoding `path` on a named worker thread.
    pub fn spawn(path: impl Into<PathBuf>, options: SamplerDesc) -> LutResult<Self> {
        let path = path.into();
        let source_name = path.display().to_string();

        let handle = thread::Builder::new()
            .name(String::from("tlut-load"))
            .spawn(move || prepare(LutSource::Path(path), options))?;

        debug!(source = %source_name, "LUT load started");
        Ok(Self {
            source_name,
            handle,
        })
    }

    /// Source path as given to [`spawn`](Self::spawn).
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// True once the worker has finished, successfully or not.
    pub fn is_ready(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker finishes and returns its result.
    pub fn wait(self) -> LutResult<SamplingResource> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(LutError::ResourceLoad {
                source_name: self.source_name,
                cause: IoError::DecodeError("loader thread panicked".into()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{identity_atlas, identity_resource};
    use crate::sampler::FilterMode;
    use tlut_core::Rgba;

    #[test]
    fn test_prepare_image() {
        let img = ImageData::from_u8(2, 1, 3, vec![255, 0, 0, 0, 0, 255]);
        let r = prepare(img, SamplerDesc::default()).unwrap();
        assert_eq!(r.dimensions(), (2, 1));
        assert_eq!(r.fetch(0, 0), Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(r.fetch(1, 0), Rgba::opaque(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_prepare_resource_is_pass_through() {
        let lut = identity_resource(&LutLayout::new(4, 2)).unwrap();
        let opts = SamplerDesc::linear().with_flip(true);
        let r = prepare(lut.clone(), opts).unwrap();
        assert!(r.shares_texels_with(&lut));
        assert_eq!(r.desc().mag_filter, FilterMode::Linear);
        assert!(r.desc().flip_vertical);
    }

    #[test]
    fn test_missing_file_is_resource_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let err = prepare(path.as_path(), SamplerDesc::default()).unwrap_err();
        match err {
            LutError::ResourceLoad { source_name, cause } => {
                assert!(source_name.ends_with("missing.png"));
                assert!(matches!(cause, IoError::Io(_)));
            }
            other => panic!("expected ResourceLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_image_is_resource_load() {
        let img = ImageData::from_u8(4, 4, 3, vec![0; 7]);
        let err = prepare(img, SamplerDesc::default()).unwrap_err();
        assert!(matches!(err, LutError::ResourceLoad { .. }));
    }

    #[test]
    fn test_prepare_for_layout() {
        let layout = LutLayout::new(4, 2);
        let img = identity_atlas(4, 2).unwrap();
        assert!(prepare_for_layout(img.clone(), SamplerDesc::default(), &layout).is_ok());

        let err = prepare_for_layout(img, SamplerDesc::default(), &LutLayout::new(4, 3))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_background_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.png");
        tlut_io::write(&path, &identity_atlas(4, 2).unwrap()).unwrap();

        let load = LutLoad::spawn(&path, SamplerDesc::default()).unwrap();
        assert!(load.source_name().ends_with("identity.png"));
        let lut = load.wait().unwrap();
        assert_eq!(lut.dimensions(), (8, 8));
    }

    #[test]
    fn test_background_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n....").unwrap();

        let load = LutLoad::spawn(path, SamplerDesc::default()).unwrap();
        while !load.is_ready() {
            std::thread::yield_now();
        }
        let err = load.wait().unwrap_err();
        assert!(matches!(
            err,
            LutError::ResourceLoad { cause: IoError::DecodeError(_), .. }
        ));
    }
}
