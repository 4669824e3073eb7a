//! QuillCrop Core - image crop and transform pipeline
//!
//! This crate turns a source image, a crop rectangle and a rotation/flip into
//! an encoded image ready for upload. It has no browser dependencies; the
//! `quillcrop-wasm` crate exposes it to JavaScript.
//!
//! # Example
//!
//! ```ignore
//! use quillcrop_core::{
//!     decode_image, produce_cropped_image, CropRectangle, PipelineOptions, TransformParameters,
//! };
//!
//! let source = decode_image(&bytes)?;
//! let output = produce_cropped_image(
//!     &source,
//!     &CropRectangle::new(0.0, 0.0, 512.0, 512.0),
//!     &TransformParameters::rotation(90.0),
//!     &PipelineOptions::default(),
//! )?;
//! assert_eq!(output.file_name(), "cropped-image.png");
//! ```

pub mod decode;
pub mod encode;
pub mod options;
pub mod pipeline;
pub mod transform;

pub use decode::{
    decode_image, validate_upload, DecodeError, ImageSource, SourceImage, SourceLoader,
};
pub use encode::{CompressOptions, EncodeError, OutputFormat, PngCompression};
pub use options::{OptionsError, PipelineOptions};
pub use pipeline::{
    compress_image, produce_cropped_image, produce_cropped_image_from,
    produce_cropped_image_from_bytes, CropError, OutputImage,
};
pub use transform::{
    rotate_size, BoundingBox, CropPolicy, CropRectangle, ExtractionError, InterpolationFilter,
    TransformParameters,
};
