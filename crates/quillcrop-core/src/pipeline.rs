//! The crop pipeline: decode, transform, extract, encode.
//!
//! Every entry point runs the same sequence:
//!
//! 1. Decode the source (EXIF orientation applied)
//! 2. Draw it onto a surface the size of its rotated bounding box
//! 3. Extract the crop rectangle from that surface
//! 4. Encode, optionally under a size cap
//!
//! The first failing stage aborts the run with a [`CropError`].

use thiserror::Error;

use crate::decode::{decode_image, DecodeError, ImageSource, SourceImage, SourceLoader};
use crate::encode::{
    compress_surface, encode_surface, CompressOptions, EncodeError, EncodeSettings, OutputFormat,
};
use crate::options::{OptionsError, PipelineOptions};
use crate::transform::{
    draw_transformed, extract_region, rotate_size, CropRectangle, ExtractionError, Surface,
    TransformParameters,
};

/// Base name used for the upload file.
const OUTPUT_FILE_STEM: &str = "cropped-image";

/// Failure of a pipeline run, tagged by stage.
#[derive(Debug, Error)]
pub enum CropError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Options(#[from] OptionsError),
}

impl CropError {
    /// Tag name of the failing stage.
    pub fn kind(&self) -> &'static str {
        match self {
            CropError::Decode(_) => "DecodeError",
            CropError::Extraction(_) => "ExtractionError",
            CropError::Encode(_) => "EncodeError",
            CropError::Options(_) => "OptionsError",
        }
    }
}

/// Encoded result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl OutputImage {
    /// File name the upload form sends, e.g. `cropped-image.png`.
    pub fn file_name(&self) -> String {
        format!("{OUTPUT_FILE_STEM}.{}", self.format.extension())
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Rotate and flip `source`, cut out `crop`, and encode the result.
///
/// `crop` is in the coordinate space of the rotated bounding box. Without
/// `options.compress`, the output is exactly the (rounded) crop size.
///
/// # Errors
///
/// - `CropError::Options` for out-of-range options
/// - `CropError::Extraction` for a non-finite rotation or an invalid crop
/// - `CropError::Encode` if the encoder fails
pub fn produce_cropped_image(
    source: &SourceImage,
    crop: &CropRectangle,
    transform: &TransformParameters,
    options: &PipelineOptions,
) -> Result<OutputImage, CropError> {
    options.validate()?;
    if !transform.rotation_degrees.is_finite() {
        return Err(ExtractionError::InvalidTransform(format!(
            "rotation must be finite, got {}",
            transform.rotation_degrees
        ))
        .into());
    }

    let bounds = rotate_size(
        source.width as f64,
        source.height as f64,
        transform.rotation_degrees,
    );
    let (surface_width, surface_height) = bounds.surface_size();
    tracing::debug!(
        source_width = source.width,
        source_height = source.height,
        rotation = transform.rotation_degrees,
        flip_horizontal = transform.flip_horizontal,
        flip_vertical = transform.flip_vertical,
        surface_width,
        surface_height,
        "drawing transformed source"
    );

    let matrix = transform.matrix(source.width, source.height);
    let surface = draw_transformed(
        Surface::new(surface_width, surface_height),
        source,
        &matrix,
        options.interpolation,
    );

    let region = extract_region(&surface, crop, options.crop_policy)?;
    tracing::debug!(
        width = region.width,
        height = region.height,
        policy = ?options.crop_policy,
        "extracted crop region"
    );

    encode_region(&region, &options.encode_settings(), options.compress.as_ref())
}

/// Decode `bytes` and run [`produce_cropped_image`] on the result.
pub fn produce_cropped_image_from_bytes(
    bytes: &[u8],
    crop: &CropRectangle,
    transform: &TransformParameters,
    options: &PipelineOptions,
) -> Result<OutputImage, CropError> {
    let source = decode_image(bytes)?;
    produce_cropped_image(&source, crop, transform, options)
}

/// Resolve `source` through `loader`, then run [`produce_cropped_image`].
///
/// Only the fetch is awaited.
pub async fn produce_cropped_image_from<L>(
    source: ImageSource,
    loader: &L,
    crop: &CropRectangle,
    transform: &TransformParameters,
    options: &PipelineOptions,
) -> Result<OutputImage, CropError>
where
    L: SourceLoader + ?Sized,
{
    let source = source.load(loader).await?;
    produce_cropped_image(&source, crop, transform, options)
}

/// Re-encode an already encoded image under `limits`.
pub fn compress_image(
    bytes: &[u8],
    settings: &EncodeSettings,
    limits: &CompressOptions,
) -> Result<OutputImage, CropError> {
    let source = decode_image(bytes)?;
    let surface = Surface::from_pixels(source.width, source.height, source.pixels);
    encode_region(&surface, settings, Some(limits))
}

fn encode_region(
    region: &Surface,
    settings: &EncodeSettings,
    limits: Option<&CompressOptions>,
) -> Result<OutputImage, CropError> {
    let output = match limits {
        Some(limits) => {
            let compressed = compress_surface(region, settings, limits)?;
            OutputImage {
                bytes: compressed.bytes,
                width: compressed.width,
                height: compressed.height,
                format: settings.format,
            }
        }
        None => OutputImage {
            bytes: encode_surface(region, settings)?,
            width: region.width,
            height: region.height,
            format: settings.format,
        },
    };

    tracing::debug!(
        format = ?output.format,
        width = output.width,
        height = output.height,
        size = output.bytes.len(),
        "encoded output"
    );
    Ok(output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
