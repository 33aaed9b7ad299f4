//! Integration tests for the tiled LUT crates.
//!
//! File-backed pipelines: atlases and images go through real PNG/JPEG
//! encoders before being sampled.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tempfile::tempdir;
    use tlut_core::Rgba;
    use tlut_io::{ImageData, PixelFormat};
    use tlut_lut::{
        evaluate, identity_atlas, identity_resource, make_transform, prepare, prepare_for_layout,
        Interpolation, LayoutConfig, LutLayout, LutLoad, SamplerDesc,
    };

    fn probe_colors() -> Vec<Rgba> {
        let steps = [0.0, 0.13, 0.5, 0.77, 1.0];
        let mut colors = Vec::new();
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    colors.push(Rgba::new(r, g, b, 1.0));
                }
            }
        }
        colors
    }

    /// Identity atlas -> 16-bit PNG -> prepare -> trilinear evaluate is neutral.
    #[test]
    fn test_identity_png16_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("identity.png");

        let atlas = identity_atlas(33, 6).unwrap().convert(PixelFormat::U16);
        tlut_io::write(&path, &atlas).expect("Failed to write atlas");

        let layout = LutLayout::new(33, 6).with_interpolation(Interpolation::Trilinear);
        let lut = prepare_for_layout(path.as_path(), SamplerDesc::default(), &layout).unwrap();
        assert_eq!(lut.dimensions(), (198, 198));

        for c in probe_colors() {
            let out = evaluate(c, &lut, &layout);
            assert!(out.max_rgb_diff(c) < 1e-3, "{c:?} -> {out:?}");
            assert_eq!(out.a, 1.0);
        }
    }

    /// 8-bit storage costs at most half a code value per channel.
    #[test]
    fn test_identity_png8_quantization() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("identity8.png");

        let atlas = identity_atlas(16, 4).unwrap().convert(PixelFormat::U8);
        tlut_io::write(&path, &atlas).unwrap();

        let layout = LutLayout::new(16, 4).with_interpolation(Interpolation::Trilinear);
        let lut = prepare_for_layout(path.as_path(), SamplerDesc::default(), &layout).unwrap();

        for c in probe_colors() {
            let out = evaluate(c, &lut, &layout);
            assert!(out.max_rgb_diff(c) <= 0.5 / 255.0 + 1e-4, "{c:?} -> {out:?}");
        }
    }

    /// Bottom-up atlases read with `flip_vertical` match top-down ones.
    #[test]
    fn test_flipped_atlas() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flipped.png");

        let atlas = identity_atlas(8, 3).unwrap();
        let row_len = (atlas.width * atlas.channels) as usize;
        let flipped: Vec<f32> = atlas
            .to_f32()
            .chunks_exact(row_len)
            .rev()
            .flatten()
            .copied()
            .collect();
        let flipped = ImageData::from_f32(atlas.width, atlas.height, 4, flipped);
        tlut_io::write(&path, &flipped.convert(PixelFormat::U16)).unwrap();

        let layout = LutLayout::new(8, 3);
        let lut = prepare(path.as_path(), SamplerDesc::nearest().with_flip(true)).unwrap();
        let reference = identity_resource(&layout).unwrap();

        for c in probe_colors() {
            let a = evaluate(c, &lut, &layout);
            let b = evaluate(c, &reference, &layout);
            assert!(a.max_rgb_diff(b) < 1e-4, "{c:?}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_background_load_then_apply() {
        let dir = tempdir().unwrap();
        let lut_path = dir.path().join("lut.png");
        let input_path = dir.path().join("input.png");
        let output_path = dir.path().join("output.png");

        let layout = LutLayout::new(16, 4).with_interpolation(Interpolation::Trilinear);
        tlut_io::write(&lut_path, &identity_atlas(16, 4).unwrap().convert(PixelFormat::U16))
            .unwrap();

        let (w, h) = (24u32, 10u32);
        let pixels: Vec<u8> = (0..w * h * 3).map(|i| ((i * 7) % 256) as u8).collect();
        tlut_io::write(&input_path, &ImageData::from_u8(w, h, 3, pixels.clone())).unwrap();

        let load = LutLoad::spawn(&lut_path, SamplerDesc::default()).unwrap();
        let input = tlut_io::read(&input_path).unwrap();
        let lut = load.wait().unwrap();

        let transform = make_transform(layout).unwrap();
        let graded = tlut_ops::apply_image(&input, &transform, &lut).unwrap();
        tlut_io::write(&output_path, &graded.convert(PixelFormat::U8)).unwrap();

        let back = tlut_io::read(&output_path).unwrap();
        assert_eq!((back.width, back.height, back.channels), (w, h, 3));
        for (orig, out) in pixels.iter().zip(back.to_u8()) {
            assert!((*orig as i32 - out as i32).abs() <= 1, "{orig} -> {out}");
        }
    }

    #[test]
    fn test_layout_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.yaml");
        std::fs::write(&path, "size: 16\ngrid: 4\ninterp: trilinear\nclampInput: false\n").unwrap();

        let layout = LayoutConfig::from_file(&path).unwrap().into_layout().unwrap();
        assert_eq!(layout.interpolation, Interpolation::Trilinear);
        assert!(!layout.clamp_input);

        let transform = make_transform(layout).unwrap();
        let lut = identity_resource(&layout).unwrap();
        let out = transform.apply(Rgba::new(0.25, 0.5, 0.75, 0.5), &lut);
        assert_abs_diff_eq!(out.r, 0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(out.g, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(out.b, 0.75, epsilon = 1e-5);
        assert_eq!(out.a, 0.5);
    }

    #[test]
    fn test_layout_file_rejects_bad_grid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "size: 64\ngrid: 7\n").unwrap();

        let err = LayoutConfig::from_file(&path).unwrap().into_layout().unwrap_err();
        assert!(err.is_configuration());
    }

    /// A flat JPEG atlas survives lossy compression closely enough.
    #[test]
    fn test_uniform_jpeg_atlas() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.jpg");

        let layout = LutLayout::new(8, 3);
        let dim = layout.atlas_dim();
        let flat = ImageData::from_u8(dim, dim, 3, vec![128; (dim * dim * 3) as usize]);
        tlut_io::write(&path, &flat).unwrap();

        let lut = prepare_for_layout(path.as_path(), SamplerDesc::default(), &layout).unwrap();
        for c in probe_colors() {
            let out = evaluate(c, &lut, &layout);
            for v in out.rgb() {
                assert_abs_diff_eq!(v, 128.0 / 255.0, epsilon = 3.0 / 255.0);
            }
        }
    }
}
