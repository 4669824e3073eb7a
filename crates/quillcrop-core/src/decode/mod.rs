//! Source decoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Resolving an [`ImageSource`] (URL or bytes) through a [`SourceLoader`]
//! - Decoding PNG, JPEG, GIF and WebP into an RGBA [`SourceImage`]
//! - Applying EXIF orientation the way browsers do
//! - Validating uploads before decoding (size cap, MIME allow-list)
//!
//! # Examples
//!
//! ```ignore
//! use quillcrop_core::decode::decode_image;
//!
//! let bytes = std::fs::read("cover.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod source;
mod types;
mod validate;

pub use reader::{decode_image, get_orientation};
pub use source::{FileLoader, ImageSource, SourceLoader};
pub use types::{DecodeError, Orientation, SourceImage, CHANNELS};
pub use validate::{validate_upload, ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES};
