//! JPEG format support.
//!
//! Some LUT packs ship their atlases as JPEG. Decoding works, but the
//! compression noise lands directly in the graded output, so prefer PNG
//! when writing.
//!
//! Output is always 8-bit RGB: grayscale is expanded, CMYK is converted
//! with the naive `(1 - c)(1 - k)` formula, and alpha is dropped on write.

use crate::{ImageData, IoError, IoResult, PixelData, PixelFormat};
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Default encoder quality (1-100).
pub const DEFAULT_QUALITY: u8 = 90;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = std::fs::File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decodes a JPEG held in memory.
pub fn read_from_memory(bytes: &[u8]) -> IoResult<ImageData> {
    decode(Cursor::new(bytes))
}

fn decode<R: Read>(reader: R) -> IoResult<ImageData> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let data: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| [l16[0], l16[0], l16[0]])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0) as u8;
                [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
            })
            .collect(),
    };

    tracing::trace!(width, height, pixel_format = ?info.pixel_format, "decoded JPEG");

    Ok(ImageData {
        width,
        height,
        channels: 3,
        format: PixelFormat::U8,
        data: PixelData::U8(data),
    })
}

/// Writes an image to a JPEG file at [`DEFAULT_QUALITY`].
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let data = write_to_memory(image, DEFAULT_QUALITY)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}

/// Encodes an image as JPEG bytes.
pub fn write_to_memory(image: &ImageData, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    image.check_len()?;

    if image.width > u16::MAX as u32 || image.height > u16::MAX as u32 {
        return Err(IoError::EncodeError(format!(
            "{}x{} exceeds JPEG limits",
            image.width, image.height
        )));
    }

    let u8_data = image.to_u8();
    let rgb: Vec<u8> = match image.channels {
        1 => u8_data.iter().flat_map(|&g| [g, g, g]).collect(),
        2 => u8_data.chunks_exact(2).flat_map(|ga| [ga[0], ga[0], ga[0]]).collect(),
        3 => u8_data,
        4 => u8_data
            .chunks_exact(4)
            .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
            .collect(),
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode(&rgb, image.width as u16, image.height as u16, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_flat_color() {
        // Flat blocks survive DCT almost exactly.
        let data: Vec<u8> = (0..16 * 16).flat_map(|_| [200u8, 100, 50, 255]).collect();
        let image = ImageData::from_u8(16, 16, 4, data);

        let bytes = write_to_memory(&image, 95).unwrap();
        let loaded = read_from_memory(&bytes).unwrap();

        assert_eq!(loaded.width, 16);
        assert_eq!(loaded.height, 16);
        assert_eq!(loaded.channels, 3);
        let px = &loaded.to_u8()[..3];
        assert!((px[0] as i32 - 200).abs() <= 3);
        assert!((px[1] as i32 - 100).abs() <= 3);
        assert!((px[2] as i32 - 50).abs() <= 3);
    }

    #[test]
    fn test_file_roundtrip() {
        let image = ImageData::from_u8(8, 8, 3, vec![128; 8 * 8 * 3]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.jpg");

        write(&path, &image).unwrap();
        let loaded = read(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (8, 8));
    }

    #[test]
    fn test_truncated_is_decode_error() {
        let err = read_from_memory(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }
}
