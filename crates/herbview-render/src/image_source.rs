//! Source images and their decoded form.

use std::sync::Arc;

use herbview_core::LoadError;
use image::ImageFormat;

/// A raster image supplied by the host, not yet decoded.
///
/// The bytes are shared, so cloning is cheap and a clone can be handed to a
/// decode worker.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl SourceImage {
    /// Wraps raw bytes with the MIME type the host declared for them.
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Reads an image file, deriving the MIME type from its extension.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        };
        Ok(Self::new(bytes, mime_type))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the declared MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decodes the image into RGBA8 pixels.
    ///
    /// Rows are kept top-to-bottom as authored: no vertical flip is applied.
    pub fn decode(&self) -> Result<DecodedImage, LoadError> {
        let format = format_for_mime(&self.mime_type)
            .or_else(|| image::guess_format(&self.bytes).ok())
            .ok_or_else(|| LoadError::DecodeError("unrecognized image data".to_string()))?;

        let img = image::load_from_memory_with_format(&self.bytes, format)
            .map_err(|e| LoadError::DecodeError(e.to_string()))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::DecodeError(
                "image has zero dimensions".to_string(),
            ));
        }

        Ok(DecodedImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

fn format_for_mime(mime: &str) -> Option<ImageFormat> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/png" => Some(ImageFormat::Png),
        _ => None,
    }
}

/// A decoded image ready for texture upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixels, row-major, first row is the top of the image.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Returns the RGBA value at `(x, y)`, with `(0, 0)` the top-left pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Number of bytes per row.
    #[must_use]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    /// Whether `pixels` holds exactly `width * height` RGBA values.
    #[must_use]
    pub fn has_consistent_size(&self) -> bool {
        let expected = u64::from(self.width)
            .checked_mul(u64::from(self.height))
            .and_then(|n| n.checked_mul(4));
        expected.is_some() && expected == u64::try_from(self.pixels.len()).ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    /// Encodes a PNG whose top row is red and remaining rows are blue.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |_, y| {
            if y == 0 {
                Rgba([255u8, 0, 0, 255])
            } else {
                Rgba([0u8, 0, 255, 255])
            }
        });
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png_keeps_orientation() {
        let source = SourceImage::new(png_bytes(3, 2), "image/png");
        let decoded = source.decode().unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.pixels.len(), 3 * 2 * 4);
        assert_eq!(decoded.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(decoded.pixel(2, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let source = SourceImage::new(vec![1u8, 2, 3, 4], "image/png");
        assert!(matches!(source.decode(), Err(LoadError::DecodeError(_))));
    }

    #[test]
    fn test_decode_mislabeled_jpeg_fails() {
        let source = SourceImage::new(png_bytes(2, 2), "image/jpeg");
        assert!(matches!(source.decode(), Err(LoadError::DecodeError(_))));
    }

    #[test]
    fn test_unknown_mime_falls_back_to_sniffing() {
        let source = SourceImage::new(png_bytes(2, 2), "application/octet-stream");
        assert!(source.decode().is_ok());
    }

    #[test]
    fn test_consistent_size() {
        let mut image = SourceImage::new(png_bytes(3, 2), "image/png").decode().unwrap();
        assert!(image.has_consistent_size());
        image.pixels.pop();
        assert!(!image.has_consistent_size());
        image.width = u32::MAX;
        image.height = u32::MAX;
        assert!(!image.has_consistent_size());
    }

    #[test]
    fn test_clone_shares_bytes() {
        let source = SourceImage::new(png_bytes(2, 2), "image/png");
        let copy = source.clone();
        assert!(std::ptr::eq(source.bytes(), copy.bytes()));
    }
}
