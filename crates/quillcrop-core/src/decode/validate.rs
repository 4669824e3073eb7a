//! Pre-decode checks for user uploads.
//!
//! The upload drop zone accepts image MIME types up to 5 MiB. These checks
//! run before any pixel work so an oversized or mislabelled file fails fast.

use image::ImageFormat;

use super::DecodeError;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the decoder can handle.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Validate an upload's size, declared MIME type and sniffed format.
///
/// `declared_mime` is what the browser reported for the `File`; it may carry
/// parameters (`image/png; charset=binary`) and is compared case-insensitively.
/// When it is absent only the sniffed format is checked.
///
/// # Errors
///
/// - `DecodeError::TooLarge` when `bytes` exceeds [`MAX_UPLOAD_BYTES`]
/// - `DecodeError::UnsupportedMimeType` when the declared type is not accepted
/// - `DecodeError::InvalidFormat` when the content is not a supported image
pub fn validate_upload(
    bytes: &[u8],
    declared_mime: Option<&str>,
) -> Result<ImageFormat, DecodeError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(DecodeError::TooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_BYTES,
        });
    }

    if let Some(mime) = declared_mime {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !ACCEPTED_MIME_TYPES.contains(&essence.as_str()) {
            return Err(DecodeError::UnsupportedMimeType(mime.to_string()));
        }
    }

    match image::guess_format(bytes) {
        Ok(
            format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP),
        ) => Ok(format),
        _ => Err(DecodeError::InvalidFormat),
    }
}
