//! Where source bytes come from.
//!
//! A source is either bytes already in memory (a freshly picked `File`) or a
//! URL (an image already on the CDN being re-cropped). Fetching is delegated to
//! a [`SourceLoader`] so the core stays free of any HTTP stack; the browser
//! bindings provide a `fetch()`-backed loader.

use async_trait::async_trait;

use super::{decode_image, DecodeError, SourceImage};

/// A reference to the image to crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A URL that must be fetched. Cross-origin URLs must permit CORS.
    Url(String),
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&str> for ImageSource {
    fn from(url: &str) -> Self {
        ImageSource::Url(url.to_string())
    }
}

/// Fetches the encoded bytes behind a URL.
///
/// Futures are not required to be `Send`: the browser implementation holds
/// JS handles across awaits.
#[async_trait(?Send)]
pub trait SourceLoader {
    /// Fetch the raw bytes for `url`.
    ///
    /// Implementations map every failure (network, CORS, non-2xx status) to
    /// `DecodeError::Fetch`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError>;
}

/// Loader that reads `file://` URLs and plain paths from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

#[async_trait(?Send)]
impl SourceLoader for FileLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        std::fs::read(path).map_err(|e| DecodeError::Fetch(format!("{path}: {e}")))
    }
}

impl ImageSource {
    /// Resolve the source to bytes (fetching if needed) and decode it.
    pub async fn load<L>(self, loader: &L) -> Result<SourceImage, DecodeError>
    where
        L: SourceLoader + ?Sized,
    {
        let bytes = match self {
            ImageSource::Bytes(bytes) => bytes,
            ImageSource::Url(url) => {
                tracing::debug!(%url, "fetching source image");
                loader.fetch(&url).await?
            }
        };
        decode_image(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Cursor;

    /// In-memory loader that records which URLs were requested.
    #[derive(Default)]
    struct MapLoader {
        entries: HashMap<String, Vec<u8>>,
        requested: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl SourceLoader for MapLoader {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
            self.requested.borrow_mut().push(url.to_string());
            self.entries
                .get(url)
                .cloned()
                .ok_or_else(|| DecodeError::Fetch(format!("404 for {url}")))
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_load_bytes_skips_loader() {
        let loader = MapLoader::default();
        let img = ImageSource::from(png_bytes(3, 2)).load(&loader).await.unwrap();

        assert_eq!((img.width, img.height), (3, 2));
        assert!(loader.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_load_url_uses_loader() {
        let mut loader = MapLoader::default();
        loader
            .entries
            .insert("https://cdn.example/cover.png".to_string(), png_bytes(4, 4));

        let img = ImageSource::from("https://cdn.example/cover.png")
            .load(&loader)
            .await
            .unwrap();

        assert_eq!((img.width, img.height), (4, 4));
        assert_eq!(
            loader.requested.borrow().as_slice(),
            ["https://cdn.example/cover.png"]
        );
    }

    #[tokio::test]
    async fn test_unreachable_url_is_fetch_error() {
        let loader = MapLoader::default();
        let result = ImageSource::from("https://cdn.example/missing.png")
            .load(&loader)
            .await;
        assert!(matches!(result, Err(DecodeError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_corrupt_fetched_bytes_is_decode_error() {
        let mut loader = MapLoader::default();
        loader
            .entries
            .insert("https://cdn.example/bad.png".to_string(), vec![1, 2, 3]);

        let result = ImageSource::from("https://cdn.example/bad.png")
            .load(&loader)
            .await;
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[tokio::test]
    async fn test_file_loader_missing_file() {
        let result = FileLoader
            .fetch("file:///definitely/not/here/cover.png")
            .await;
        assert!(matches!(result, Err(DecodeError::Fetch(_))));
    }
}
