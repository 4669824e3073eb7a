//! Source decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, SourceImage};

/// Decode any supported image (PNG, JPEG, GIF, WebP) from bytes.
///
/// EXIF orientation is applied so that the returned dimensions are the
/// natural dimensions a browser would report for the same file.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are empty or the format
/// cannot be recognised, and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = get_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let oriented = apply_orientation(img, orientation);

    let source = SourceImage::from_rgba_image(oriented.into_rgba8());
    if source.is_empty() {
        return Err(DecodeError::CorruptedFile(
            "image has zero width or height".to_string(),
        ));
    }

    tracing::debug!(
        width = source.width,
        height = source.height,
        ?orientation,
        "decoded source image"
    );
    Ok(source)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Read the EXIF orientation tag.
///
/// Returns `Orientation::Normal` when there is no EXIF block or the tag is
/// missing.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 20) as u8, (y * 20) as u8, 90, 255])
        });
        let mut bytes = Vec::new();
        let dynamic = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).into_rgb8()),
            _ => DynamicImage::ImageRgba8(img),
        };
        dynamic
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_preserves_pixels() {
        let bytes = encode_test_image(4, 3, ImageFormat::Png);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 4);
        assert_eq!(img.height, 3);
        assert_eq!(img.pixels.len(), 4 * 3 * 4);
        assert_eq!(img.pixel(2, 1), [40, 20, 90, 255]);
    }

    #[test]
    fn test_decode_jpeg() {
        let bytes = encode_test_image(8, 6, ImageFormat::Jpeg);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 8);
        assert_eq!(img.height, 6);
        // JPEG has no alpha; decoding fills it opaque
        assert_eq!(img.pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encode_test_image(16, 16, ImageFormat::Png);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        let bytes = encode_test_image(2, 2, ImageFormat::Png);
        assert_eq!(get_orientation(&bytes), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    /// Insert an APP1 segment carrying only an Orientation tag right after
    /// the JPEG SOI marker.
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        // Big-endian TIFF header, first IFD at offset 8
        payload.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        // One entry: tag 0x0112, type SHORT, count 1, value
        payload.extend_from_slice(&[0x00, 0x01]);
        payload.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        payload.extend_from_slice(&orientation.to_be_bytes());
        payload.extend_from_slice(&[0x00, 0x00]);
        // No next IFD
        payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let length = (payload.len() + 2) as u16;
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let jpeg = encode_test_image(8, 4, ImageFormat::Jpeg);
        let bytes = with_exif_orientation(&jpeg, 6);

        assert_eq!(get_orientation(&bytes), Orientation::Rotate90CW);

        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (4, 8));
    }

    #[test]
    fn test_decode_exif_mirror_keeps_dimensions() {
        let jpeg = encode_test_image(8, 4, ImageFormat::Jpeg);
        let bytes = with_exif_orientation(&jpeg, 2);

        assert_eq!(get_orientation(&bytes), Orientation::FlipHorizontal);
        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (8, 4));
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(3, 1));
        let result = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((result.width(), result.height()), (1, 3));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let mut raw = RgbaImage::new(2, 1);
        raw.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        raw.put_pixel(1, 0, Rgba([0, 255, 0, 255]));

        let result = apply_orientation(DynamicImage::ImageRgba8(raw), Orientation::FlipHorizontal)
            .into_rgba8();

        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
