//! PNG format support.
//!
//! PNG is the preferred container for LUT atlases: lossless, 8 or 16 bits
//! per channel, and every grading tool can export it.
//!
//! - 8-bit and 16-bit samples
//! - Gray, gray-alpha, RGB and RGBA (palette images are expanded on read)
//! - Reading from a path or from memory
//!
//! # Example
//!
//! ```rust,ignore
//! use tlut_io::png::{read, write};
//!
//! let atlas = read("lut.png")?;
//! write("copy.png", &atlas)?;
//! ```

use crate::{ImageData, IoError, IoResult, PixelData, PixelFormat};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decodes a PNG held in memory.
pub fn read_from_memory(bytes: &[u8]) -> IoResult<ImageData> {
    decode(Cursor::new(bytes))
}

fn decode<R: BufRead + Seek>(reader: R) -> IoResult<ImageData> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                other, info.bit_depth
            )));
        }
    };

    let (format, data) = match info.bit_depth {
        png::BitDepth::Eight => (PixelFormat::U8, PixelData::U8(bytes.to_vec())),
        png::BitDepth::Sixteen => (PixelFormat::U16, PixelData::U16(bytes_to_u16(bytes))),
        depth => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, depth
            )));
        }
    };

    tracing::trace!(
        width = info.width,
        height = info.height,
        channels,
        ?format,
        "decoded PNG"
    );

    Ok(ImageData {
        width: info.width,
        height: info.height,
        channels,
        format,
        data,
    })
}

/// Writes an image to a PNG file.
///
/// `U16` data is written with 16-bit samples, everything else as 8-bit.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let data = write_to_memory(image)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}

/// Encodes an image as PNG bytes.
pub fn write_to_memory(image: &ImageData) -> IoResult<Vec<u8>> {
    image.check_len()?;

    let color_type = match image.channels {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let (depth, samples) = match &image.data {
        PixelData::U16(data) => (
            png::BitDepth::Sixteen,
            data.iter().flat_map(|v| v.to_be_bytes()).collect::<Vec<u8>>(),
        ),
        _ => (png::BitDepth::Eight, image.to_u8()),
    };

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, image.width, image.height);
        encoder.set_color(color_type);
        encoder.set_depth(depth);
        encoder.set_compression(png::Compression::default());
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(&samples)
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
    }

    Ok(buffer)
}

/// Converts big-endian byte slice to u16 vector.
fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageData {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 8) as u8);
                data.push((y * 8) as u8);
                data.push(128);
            }
        }
        ImageData::from_u8(width, height, 3, data)
    }

    #[test]
    fn test_roundtrip_rgb() {
        let image = gradient(32, 16);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded.width, 32);
        assert_eq!(loaded.height, 16);
        assert_eq!(loaded.channels, 3);
        assert_eq!(loaded.to_u8(), image.to_u8());
    }

    #[test]
    fn test_sixteen_bit_kept() {
        let data: Vec<u16> = (0..4 * 4 * 4).map(|i| (i * 1000) as u16).collect();
        let image = ImageData::from_u16(4, 4, 4, data.clone());

        let bytes = write_to_memory(&image).unwrap();
        let loaded = read_from_memory(&bytes).unwrap();

        assert_eq!(loaded.format, PixelFormat::U16);
        match loaded.data {
            PixelData::U16(v) => assert_eq!(v, data),
            other => panic!("expected U16 data, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = read_from_memory(b"\x89PNG\r\n\x1a\nnot really").unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }

    #[test]
    fn test_bad_channel_count() {
        let image = ImageData::from_u8(1, 1, 5, vec![0; 5]);
        assert!(matches!(write_to_memory(&image), Err(IoError::EncodeError(_))));
    }
}
